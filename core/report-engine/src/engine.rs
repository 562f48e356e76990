//! FILENAME: core/report-engine/src/engine.rs
//! Report Engine - Groups query rows into pages.
//!
//! Rows are partitioned by the raw value of the primary page field. Pages
//! come out in first-seen key order and keep their rows in input order.
//! Nothing is cached between calls: every filter or sort change re-runs
//! the whole pipeline over the fresh query result.

use rustc_hash::FxHashMap;
use serde::Serialize;
use smallvec::SmallVec;
use query_model::{Cell, Field, FieldIndex, GroupKey, QueryResult, Row};
use crate::decorate::{decorate_key, KeyDecorator, NoDecoration, SubjectLinkDecorator};
use crate::definition::ReportDefinition;
use crate::error::ReportError;
use crate::view::{render, RenderModel};

const LOG_TARGET: &str = "REPORT";

// ============================================================================
// PAGE
// ============================================================================

/// One page of the report, typically one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<'a> {
    /// Primary page-field cell of the first row.
    pub key: Cell,

    /// Schema index of the primary page field.
    pub key_field: FieldIndex,

    /// Every row sharing the key, in input order.
    pub rows: Vec<&'a Row>,

    pub first: &'a Row,

    /// Source of the secondary page-field values.
    pub page_field_data: &'a Row,

    /// 0-based position in emission order.
    pub index: usize,
}

impl<'a> Page<'a> {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The cell shown for a page field: the key for the primary field, the
    /// `page_field_data` row for everything else.
    pub fn page_value(&self, field: &Field) -> Option<&Cell> {
        if field.index == self.key_field {
            Some(&self.key)
        } else {
            self.page_field_data.get(field.index)
        }
    }
}

// ============================================================================
// PAGINATION
// ============================================================================

/// Splits `rows` into pages keyed by `page_fields[0]`.
///
/// When secondary page fields exist, `page_field_data` is the first row
/// whose first secondary field is non-null, else `first`. All secondary
/// fields are read from that one row.
pub fn paginate<'a>(
    rows: &'a [Row],
    page_fields: &[Field],
    grid_fields: &[Field],
) -> Result<Vec<Page<'a>>, ReportError> {
    let primary = page_fields.first().ok_or(ReportError::MissingPageBreak)?;
    let secondary = page_fields.get(1);

    check_row_widths(rows, page_fields, grid_fields)?;

    // Group in first-seen order: slot lookup by key, member list per slot
    let mut slots: FxHashMap<GroupKey, usize> = FxHashMap::default();
    let mut groups: Vec<(Cell, SmallVec<[usize; 8]>)> = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let cell = row
            .get(primary.index)
            .ok_or_else(|| ReportError::FieldNotFound(primary.name.clone()))?;

        let slot = *slots.entry(GroupKey::from(&cell.value)).or_insert_with(|| {
            groups.push((cell.clone(), SmallVec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(row_index);
    }

    let mut pages = Vec::with_capacity(groups.len());
    for (index, (key, members)) in groups.into_iter().enumerate() {
        let page_rows: Vec<&'a Row> = members.iter().map(|&i| &rows[i]).collect();
        let first = page_rows[0];

        let page_field_data = match secondary {
            Some(field) => page_rows
                .iter()
                .copied()
                .find(|row| row.get(field.index).is_some_and(|c| !c.is_null()))
                .unwrap_or(first),
            None => first,
        };

        pages.push(Page {
            key,
            key_field: primary.index,
            rows: page_rows,
            first,
            page_field_data,
            index,
        });
    }

    log::debug!(
        target: LOG_TARGET,
        "paginate rows={} pages={} page_fields={} grid_fields={}",
        rows.len(),
        pages.len(),
        page_fields.len(),
        grid_fields.len()
    );

    Ok(pages)
}

/// Rejects rows too short to hold every referenced field.
fn check_row_widths(
    rows: &[Row],
    page_fields: &[Field],
    grid_fields: &[Field],
) -> Result<(), ReportError> {
    let required = page_fields
        .iter()
        .chain(grid_fields)
        .map(|f| f.index + 1)
        .max()
        .unwrap_or(0);

    for row in rows {
        if row.len() < required {
            let missing = page_fields
                .iter()
                .chain(grid_fields)
                .find(|f| f.index >= row.len());
            if let Some(field) = missing {
                return Err(ReportError::FieldNotFound(field.name.clone()));
            }
        }
    }
    Ok(())
}

// ============================================================================
// REPORT PAGER
// ============================================================================

/// Runs a report definition against a query result.
pub struct ReportPager<'a> {
    definition: &'a ReportDefinition,
    decorator: Box<dyn KeyDecorator + 'a>,
}

impl<'a> ReportPager<'a> {
    pub fn new(definition: &'a ReportDefinition) -> Self {
        let decorator: Box<dyn KeyDecorator + 'a> = match &definition.key_link {
            Some(options) => Box::new(SubjectLinkDecorator::new(options.clone())),
            None => Box::new(NoDecoration),
        };
        ReportPager { definition, decorator }
    }

    /// Replaces the decorator derived from the definition's key link options.
    pub fn with_decorator(mut self, decorator: impl KeyDecorator + 'a) -> Self {
        self.decorator = Box::new(decorator);
        self
    }

    /// Resolves fields, paginates, decorates page keys and renders.
    pub fn run(&self, result: &QueryResult) -> Result<RenderModel, ReportError> {
        let definition = self.definition;
        log::debug!(
            target: LOG_TARGET,
            "run report_id={} version={} rows={}",
            definition.id,
            definition.version,
            result.row_count()
        );

        let resolved = definition.resolve(&result.schema)?;
        if resolved.page_fields.len() > 2 {
            log::debug!(
                target: LOG_TARGET,
                "report_id={} reads {} secondary page fields from one row",
                definition.id,
                resolved.page_fields.len() - 1
            );
        }

        let mut pages = paginate(&result.rows, &resolved.page_fields, &resolved.grid_fields)?;
        for page in &mut pages {
            page.key = decorate_key(&page.key, page.index, self.decorator.as_ref());
        }

        let mut model = render(
            &pages,
            &resolved.page_fields,
            &resolved.grid_fields,
            definition.orientation,
        )?;
        model.report_id = definition.id;
        model.version = definition.version;

        log::info!(
            target: LOG_TARGET,
            "rendered report_id={} pages={} rows={} orientation={:?}",
            definition.id,
            model.page_count(),
            model.total_rows,
            model.orientation
        );

        Ok(model)
    }
}

/// Convenience wrapper: builds a pager for `definition` and runs it.
pub fn calculate_report(
    definition: &ReportDefinition,
    result: &QueryResult,
) -> Result<RenderModel, ReportError> {
    ReportPager::new(definition).run(result)
}

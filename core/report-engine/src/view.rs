//! FILENAME: core/report-engine/src/view.rs
//! Report View - Renderable output for the template layer.
//!
//! Each page becomes a header (one item per page field) plus an inner grid.
//! In the original orientation the grid has one row per page row and one
//! column per grid field. Transposed, the report also carries one grid
//! across all pages: pages are the columns (ordered by page index), the
//! first grid field labels them and every remaining grid field becomes a
//! labelled row. Each page's own grid is transposed the same way, with its
//! rows as columns, so the number of cells carried per page is unchanged.

use serde::{Deserialize, Serialize};
use query_model::{Cell, Field, Row};
use crate::definition::{Orientation, ReportId};
use crate::engine::Page;
use crate::error::ReportError;

// ============================================================================
// PAGE HEADER
// ============================================================================

/// A page-level value shown once in the page header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderItem {
    pub field: String,
    pub caption: String,
    pub cell: Cell,
}

// ============================================================================
// INNER GRID
// ============================================================================

/// One row of a page's inner grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridRow {
    /// Row label (the grid field caption when transposed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub cells: Vec<Cell>,
}

/// The inner grid of one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGrid {
    pub column_labels: Vec<String>,
    pub rows: Vec<GridRow>,
}

impl PageGrid {
    /// Number of data cells, excluding labels.
    pub fn data_cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }
}

// ============================================================================
// RENDERED PAGE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    pub index: usize,
    pub key: Cell,
    pub header: Vec<HeaderItem>,
    pub grid: PageGrid,
    /// Number of source rows on this page.
    pub row_count: usize,
}

// ============================================================================
// MAIN VIEW STRUCT
// ============================================================================

/// The complete rendered report, handed to the template layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    pub report_id: ReportId,
    pub orientation: Orientation,
    pub pages: Vec<RenderedPage>,
    /// Report-wide transposed grid: one column per page, ordered by page
    /// index. Only set in the transposed orientation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transposed: Option<PageGrid>,
    pub total_rows: usize,
    /// Definition version this model was rendered from.
    pub version: u64,
}

impl RenderModel {
    pub fn new(orientation: Orientation) -> Self {
        RenderModel {
            report_id: 0,
            orientation,
            pages: Vec::new(),
            transposed: None,
            total_rows: 0,
            version: 0,
        }
    }

    /// True when the query returned no rows ("no results" state).
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string(self)?)
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Lays out already-paginated pages in the requested orientation.
pub fn render(
    pages: &[Page<'_>],
    page_fields: &[Field],
    grid_fields: &[Field],
    orientation: Orientation,
) -> Result<RenderModel, ReportError> {
    let mut model = RenderModel::new(orientation);

    for page in pages {
        let header = page_fields
            .iter()
            .map(|field| -> Result<HeaderItem, ReportError> {
                let cell = page
                    .page_value(field)
                    .ok_or_else(|| ReportError::FieldNotFound(field.name.clone()))?;
                Ok(HeaderItem {
                    field: field.name.clone(),
                    caption: field.caption.clone(),
                    cell: cell.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let grid = match orientation {
            Orientation::Original => original_grid(page, grid_fields)?,
            Orientation::Transposed => transposed_grid(page, grid_fields)?,
        };

        model.total_rows += page.row_count();
        model.pages.push(RenderedPage {
            index: page.index,
            key: page.key.clone(),
            header,
            grid,
            row_count: page.row_count(),
        });
    }

    if orientation == Orientation::Transposed {
        model.transposed = Some(report_transposed_grid(pages, grid_fields)?);
    }

    Ok(model)
}

fn grid_cell(row: &Row, field: &Field) -> Result<Cell, ReportError> {
    row.get(field.index)
        .cloned()
        .ok_or_else(|| ReportError::FieldNotFound(field.name.clone()))
}

fn original_grid(page: &Page<'_>, grid_fields: &[Field]) -> Result<PageGrid, ReportError> {
    let column_labels = grid_fields.iter().map(|f| f.caption.clone()).collect();

    let mut rows = Vec::with_capacity(page.row_count());
    for row in &page.rows {
        let cells = grid_fields
            .iter()
            .map(|field| grid_cell(row, field))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(GridRow { label: None, cells });
    }

    Ok(PageGrid { column_labels, rows })
}

fn transposed_grid(page: &Page<'_>, grid_fields: &[Field]) -> Result<PageGrid, ReportError> {
    let Some((label_field, value_fields)) = grid_fields.split_first() else {
        return Ok(PageGrid::default());
    };

    let column_labels = page
        .rows
        .iter()
        .map(|row| grid_cell(row, label_field).map(|c| c.display_text()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::with_capacity(value_fields.len());
    for field in value_fields {
        let cells = page
            .rows
            .iter()
            .map(|row| grid_cell(row, field))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(GridRow {
            label: Some(field.caption.clone()),
            cells,
        });
    }

    Ok(PageGrid { column_labels, rows })
}

/// Pages become columns, ordered by page index. The first grid field of
/// each page's first row labels its column; every other grid field is a
/// row with one cell per page.
fn report_transposed_grid(pages: &[Page<'_>], grid_fields: &[Field]) -> Result<PageGrid, ReportError> {
    let Some((label_field, value_fields)) = grid_fields.split_first() else {
        return Ok(PageGrid::default());
    };

    let mut ordered: Vec<&Page<'_>> = pages.iter().collect();
    ordered.sort_by_key(|page| page.index);

    let column_labels = ordered
        .iter()
        .map(|page| grid_cell(page.first, label_field).map(|c| c.display_text()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut rows = Vec::with_capacity(value_fields.len());
    for field in value_fields {
        let cells = ordered
            .iter()
            .map(|page| grid_cell(page.first, field))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(GridRow {
            label: Some(field.caption.clone()),
            cells,
        });
    }

    Ok(PageGrid { column_labels, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::paginate;
    use query_model::Schema;

    fn setup() -> (Schema, Vec<Row>) {
        let schema = Schema::new(vec![
            Field::new("Subject"),
            Field::new("Visit"),
            Field::new("Val").with_caption("Value"),
        ])
        .unwrap();
        let rows = vec![
            Row::new(vec![Cell::text("A"), Cell::text("1"), Cell::number(10.0)]),
            Row::new(vec![Cell::text("A"), Cell::text("2"), Cell::number(20.0)]),
            Row::new(vec![Cell::text("B"), Cell::text("1"), Cell::number(5.0)]),
        ];
        (schema, rows)
    }

    fn fields(schema: &Schema, names: &[&str]) -> Vec<Field> {
        names.iter().map(|n| schema.field(n).unwrap().clone()).collect()
    }

    #[test]
    fn test_original_layout() {
        let (schema, rows) = setup();
        let page_fields = fields(&schema, &["Subject"]);
        let grid_fields = fields(&schema, &["Visit", "Val"]);
        let pages = paginate(&rows, &page_fields, &grid_fields).unwrap();

        let model = render(&pages, &page_fields, &grid_fields, Orientation::Original).unwrap();
        assert_eq!(model.page_count(), 2);
        assert_eq!(model.total_rows, 3);

        let a = &model.pages[0];
        assert_eq!(a.header.len(), 1);
        assert_eq!(a.header[0].cell.display_text(), "A");
        assert_eq!(a.grid.column_labels, vec!["Visit", "Value"]);
        assert_eq!(a.grid.rows.len(), 2);
        assert_eq!(a.grid.rows[1].cells[1], Cell::number(20.0));
        assert_eq!(a.grid.rows[0].label, None);
    }

    #[test]
    fn test_transposed_layout() {
        let (schema, rows) = setup();
        let page_fields = fields(&schema, &["Subject"]);
        let grid_fields = fields(&schema, &["Visit", "Val"]);
        let pages = paginate(&rows, &page_fields, &grid_fields).unwrap();

        let model = render(&pages, &page_fields, &grid_fields, Orientation::Transposed).unwrap();
        let a = &model.pages[0];
        assert_eq!(a.grid.column_labels, vec!["1", "2"]);
        assert_eq!(a.grid.rows.len(), 1);
        assert_eq!(a.grid.rows[0].label.as_deref(), Some("Value"));
        assert_eq!(a.grid.rows[0].cells, vec![Cell::number(10.0), Cell::number(20.0)]);
    }

    #[test]
    fn test_transposed_report_has_one_column_per_page() {
        let (schema, rows) = setup();
        let page_fields = fields(&schema, &["Subject"]);
        let grid_fields = fields(&schema, &["Visit", "Val"]);
        let pages = paginate(&rows, &page_fields, &grid_fields).unwrap();

        let model = render(&pages, &page_fields, &grid_fields, Orientation::Transposed).unwrap();
        let grid = model.transposed.as_ref().unwrap();
        assert_eq!(grid.column_labels, vec!["1", "1"]);
        assert_eq!(grid.rows.len(), grid_fields.len() - 1);
        assert_eq!(grid.rows[0].label.as_deref(), Some("Value"));
        assert_eq!(grid.rows[0].cells, vec![Cell::number(10.0), Cell::number(5.0)]);
    }

    #[test]
    fn test_transposed_report_orders_columns_by_page_index() {
        let (schema, rows) = setup();
        let page_fields = fields(&schema, &["Subject"]);
        let grid_fields = fields(&schema, &["Visit", "Val"]);
        let mut pages = paginate(&rows, &page_fields, &grid_fields).unwrap();
        pages.reverse();

        let model = render(&pages, &page_fields, &grid_fields, Orientation::Transposed).unwrap();
        let grid = model.transposed.unwrap();
        assert_eq!(grid.rows[0].cells, vec![Cell::number(10.0), Cell::number(5.0)]);
    }

    #[test]
    fn test_original_has_no_report_grid() {
        let (schema, rows) = setup();
        let page_fields = fields(&schema, &["Subject"]);
        let grid_fields = fields(&schema, &["Visit", "Val"]);
        let pages = paginate(&rows, &page_fields, &grid_fields).unwrap();

        let model = render(&pages, &page_fields, &grid_fields, Orientation::Original).unwrap();
        assert_eq!(model.transposed, None);
    }

    #[test]
    fn test_transposed_without_grid_fields() {
        let (schema, rows) = setup();
        let page_fields = fields(&schema, &["Subject"]);
        let pages = paginate(&rows, &page_fields, &[]).unwrap();

        let model = render(&pages, &page_fields, &[], Orientation::Transposed).unwrap();
        assert_eq!(model.pages[0].grid, PageGrid::default());
        assert_eq!(model.transposed, Some(PageGrid::default()));
    }

    #[test]
    fn test_empty_pages_render_empty_model() {
        let model = render(&[], &[], &[], Orientation::Original).unwrap();
        assert!(model.is_empty());
        assert_eq!(model.total_rows, 0);
    }
}

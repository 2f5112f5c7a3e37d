use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::cache::LoadCache;
use crate::data::insight;
use crate::data::model::{ColumnKind, Insight, Table, TableCollection};
use crate::data::resolve::resolve;

/// Columns with more unique values than this are not offered for coloring.
const MAX_COLOR_CARDINALITY: usize = 20;

// ---------------------------------------------------------------------------
// Chart configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Scatter,
    Line,
    Bar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Scatter, ChartKind::Line, ChartKind::Bar];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter",
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
        }
    }
}

/// User-selected chart columns and style.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub x_column: Option<String>,
    pub y_column: Option<String>,
    /// Categorical column used to color scatter points.
    pub color_column: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            kind: ChartKind::Scatter,
            x_column: None,
            y_column: None,
            color_column: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Preview,
    Chart,
    Insights,
    Report,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Preview, Tab::Chart, Tab::Insights, Tab::Report];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Preview => "Preview",
            Tab::Chart => "Chart",
            Tab::Insights => "Insights",
            Tab::Report => "Report",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded file (None until the user opens one).
    pub collection: Option<Arc<TableCollection>>,

    /// Display name of the loaded file.
    pub source_name: Option<String>,

    /// Sheet choice for multi-sheet workbooks; single-sheet sources resolve
    /// without one.
    pub selected_sheet: Option<String>,

    /// Which central tab is showing.
    pub active_tab: Tab,

    /// Chart column selections.
    pub chart: ChartConfig,

    /// Insights derived from the current table (cached per selection).
    pub insights: Vec<Insight>,

    /// Colour map for the chart's color-by column.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    /// Content-addressed memoization of previous loads.
    pub cache: LoadCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            collection: None,
            source_name: None,
            selected_sheet: None,
            active_tab: Tab::Preview,
            chart: ChartConfig::default(),
            insights: Vec::new(),
            color_map: None,
            status_message: None,
            loading: false,
            cache: LoadCache::new(),
        }
    }
}

impl AppState {
    /// Load a file's bytes (through the cache) and make it current.
    /// Errors land in `status_message`; previous state stays intact.
    pub fn load_from_bytes(&mut self, bytes: &[u8], filename: &str) {
        self.loading = true;
        match self.cache.get_or_load(bytes, filename) {
            Ok(collection) => {
                log::info!(
                    "Loaded {} with {} sheet(s): {:?}",
                    filename,
                    collection.len(),
                    collection.sheet_names()
                );
                self.set_collection(filename.to_string(), collection);
            }
            Err(e) => {
                log::error!("Failed to load {filename}: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.loading = false;
            }
        }
    }

    /// Ingest a newly loaded collection, pick a sheet, derive insights.
    pub fn set_collection(&mut self, name: String, collection: Arc<TableCollection>) {
        // Multi-sheet workbooks preselect the first sheet; the picker in the
        // side panel lets the user change it.
        self.selected_sheet = if collection.len() > 1 {
            collection.sheet_names().first().map(|s| s.to_string())
        } else {
            None
        };
        self.source_name = Some(name);
        self.collection = Some(collection);
        self.status_message = None;
        self.loading = false;
        self.active_tab = Tab::Preview;
        self.refresh_analysis();
    }

    /// Switch to another sheet of the current workbook.
    pub fn select_sheet(&mut self, sheet: String) {
        self.selected_sheet = Some(sheet);
        self.refresh_analysis();
    }

    /// The table the whole UI works on, per the current sheet selection.
    pub fn current_table(&self) -> Option<&Table> {
        let collection = self.collection.as_ref()?;
        resolve(collection, self.selected_sheet.as_deref()).ok()
    }

    /// Re-derive insights, chart defaults, and the colour map after the
    /// file or sheet changed.
    pub fn refresh_analysis(&mut self) {
        let Some(table) = self.current_table() else {
            self.insights.clear();
            self.chart = ChartConfig::default();
            self.color_map = None;
            return;
        };

        let insights = insight::extract(table);

        let numeric: Vec<String> = table
            .numeric_columns()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        let x_column = numeric.first().cloned();
        let y_column = numeric.get(1).or_else(|| numeric.first()).cloned();

        // Default color-by: first low-cardinality text column.
        let color_column = table
            .columns()
            .iter()
            .find(|c| {
                c.kind == ColumnKind::Text
                    && c.unique_values().len() <= MAX_COLOR_CARDINALITY
            })
            .map(|c| c.name.clone());
        let color_map = color_column
            .as_deref()
            .and_then(|name| table.column(name))
            .map(|c| ColorMap::new(&c.name, &c.unique_values()));

        self.insights = insights;
        self.chart = ChartConfig {
            kind: self.chart.kind,
            x_column,
            y_column,
            color_column,
        };
        self.color_map = color_map;
    }

    /// Set the chart's color-by column and rebuild the map.
    pub fn set_color_column(&mut self, column: Option<String>) {
        let color_map = match (&column, self.current_table()) {
            (Some(name), Some(table)) => table
                .column(name)
                .map(|c| ColorMap::new(&c.name, &c.unique_values())),
            _ => None,
        };
        self.chart.color_column = column;
        self.color_map = color_map;
    }
}

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::PathBuf;

/// One named group of candidate files. The table in `data/categories.yaml`
/// declares them in emission order; order is significant and fixed.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub name: String,
    pub discovery: Discovery,
}

/// How a category proposes candidate paths. Candidates are not checked
/// for existence here; that is the collector's job.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Discovery {
    /// Declared paths, verbatim, in declared order.
    Fixed { paths: Vec<PathBuf> },
    /// Recursive filtered descent under `root` (relative to the project
    /// root). `max_depth: 1` expresses a flat, root-level scan.
    Scan {
        root: PathBuf,
        extensions: Vec<String>,
        #[serde(default)]
        exclude_dirs: Vec<String>,
        #[serde(default)]
        max_depth: Option<usize>,
    },
}

#[derive(Debug, Deserialize)]
struct CategoryTable {
    categories: Vec<Category>,
}

static CATEGORY_TABLE: Lazy<CategoryTable> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/categories.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/categories.yaml")
});

/// The fixed, ordered category table, loaded once at first use.
pub fn categories() -> &'static [Category] {
    &CATEGORY_TABLE.categories
}

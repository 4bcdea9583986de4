use serde::{Deserialize, Serialize};

use crate::model::CostKind;
use crate::parsing::fields::{DuplicateMatches, PairSelection};
use crate::parsing::segment::{BlockBoundary, DEFAULT_PREFIXES};
use crate::tabular::AliasTable;

/// How a cost figure is pulled out of study report text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub cost_kind: CostKind,
    /// Candidate section headings, highest priority first.
    pub start_markers: Vec<String>,
    pub end_markers: Vec<String>,
    #[serde(default)]
    pub generator: GeneratorDef,
    pub policy: PolicyDef,
}

/// Study-type codes that may prefix a generator number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorDef {
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
}

impl Default for GeneratorDef {
    fn default() -> Self {
        GeneratorDef {
            prefixes: default_prefixes(),
        }
    }
}

fn default_prefixes() -> Vec<String> {
    DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyDef {
    /// Sum one amount of every cost pair in each generator block.
    SummedDualValue {
        #[serde(default = "default_sentinel")]
        sentinel: String,
        #[serde(default)]
        pair_selection: PairSelection,
        #[serde(default)]
        block_boundary: BlockBoundary,
    },
    /// One amount per generator mention followed by a keyword.
    ContextualSingleValue {
        #[serde(default = "default_keyword")]
        keyword: String,
        /// Maximum characters between identifier, keyword and amount.
        #[serde(default = "default_max_gap")]
        max_gap: usize,
        #[serde(default)]
        duplicates: DuplicateMatches,
    },
}

fn default_sentinel() -> String {
    "Total".into()
}

fn default_keyword() -> String {
    "Interconnection".into()
}

fn default_max_gap() -> usize {
    200
}

/// How a cost figure is pulled out of a study workbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbookProfile {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub cost_kind: CostKind,
    #[serde(default = "default_sheet")]
    pub sheet: String,
    pub aliases: AliasTable,
    /// Case-insensitive substrings marking a relevant upgrade description.
    pub keywords: Vec<String>,
}

fn default_sheet() -> String {
    "Assigned Upgrade Costs".into()
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One extracted line entry on a bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillItem {
    pub item_name: String,
    #[serde(default)]
    pub item_amount: f64,
    #[serde(default)]
    pub item_rate: f64,
    #[serde(default)]
    pub item_quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLineItems {
    pub page_no: String,
    pub page_type: String,
    #[serde(default)]
    pub bill_items: Vec<BillItem>,
}

/// Schema the model is asked to fill in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillData {
    #[serde(default)]
    pub pagewise_line_items: Vec<PageLineItems>,
    #[serde(default)]
    pub total_item_count: u64,
}

impl BillData {
    pub const PAGE_TYPES: [&'static str; 3] = ["Bill Detail", "Final Bill", "Pharmacy"];

    pub fn empty_value() -> Value {
        serde_json::json!({
            "pagewise_line_items": [],
            "total_item_count": 0
        })
    }

    /// Lenient typed view over model output. `None` when the shape does not match.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn page_count(&self) -> usize {
        self.pagewise_line_items.len()
    }

    /// Pages whose label is outside `PAGE_TYPES`. The data is still returned as-is.
    pub fn unlabelled_page_count(&self) -> usize {
        self.pagewise_line_items
            .iter()
            .filter(|page| !Self::PAGE_TYPES.contains(&page.page_type.as_str()))
            .count()
    }

    pub fn line_item_count(&self) -> usize {
        self.pagewise_line_items
            .iter()
            .map(|page| page.bill_items.len())
            .sum()
    }
}

/// One element of the data stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Feature vector.
    pub features: Vec<f64>,

    /// Class index, if the item is labeled.
    pub label: Option<usize>,
}

impl Item {
    pub fn labeled(features: Vec<f64>, label: usize) -> Self {
        Self {
            features,
            label: Some(label),
        }
    }

    pub fn unlabeled(features: Vec<f64>) -> Self {
        Self {
            features,
            label: None,
        }
    }

    pub fn dim(&self) -> usize {
        self.features.len()
    }

    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }
}

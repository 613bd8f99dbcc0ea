//! Label encoding for categorical string features

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Maps each distinct label to its index in the sorted list of classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit the encoder on a sequence of labels
    pub fn fit<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classes: Vec<String> = labels
            .into_iter()
            .map(|label| label.as_ref().to_string())
            .collect();
        classes.sort();
        classes.dedup();

        if classes.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a label encoder without labels".to_string(),
            ));
        }

        Ok(Self { classes })
    }

    /// Fitted classes in encoding order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Encode a single label
    pub fn transform(&self, label: &str) -> Result<usize> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .map_err(|_| MathError::UnknownLabel(label.to_string()))
    }

    /// Encode a sequence of labels, failing on the first unknown one
    pub fn transform_all<I, S>(&self, labels: I) -> Result<Vec<usize>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.transform(label.as_ref()))
            .collect()
    }

    /// Label for an encoded index
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

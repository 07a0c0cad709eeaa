/// Placeholder prefix used when no configuration overrides it.
pub const DEFAULT_PREFIX: &str = "un";

/// Hands out `un1`, `un2`, … to records that have no classification.
///
/// Numbering restarts with every call to [`assign`](Self::assign): the first
/// missing label seen in that call gets `1`. Present labels pass through and
/// do not consume a number.
#[derive(Debug, Clone)]
pub struct PseudoLabelAssigner {
    prefix: String,
}

impl Default for PseudoLabelAssigner {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl PseudoLabelAssigner {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn label(&self, seq: usize) -> String {
        format!("{}{seq}", self.prefix)
    }

    /// Fill every `None` in encounter order.
    pub fn assign<I>(&self, labels: I) -> Vec<String>
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut next = 0usize;
        let out: Vec<String> = labels
            .into_iter()
            .map(|label| {
                label.unwrap_or_else(|| {
                    next += 1;
                    self.label(next)
                })
            })
            .collect();
        log::debug!("Assigned {next} pseudo-labels");
        out
    }
}

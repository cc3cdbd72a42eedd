use std::fmt;

use uuid::Uuid;

/// Identity of one installed producer.
///
/// A fresh id is minted every time the controller installs a producer, so
/// anything tagged with an older id (input tickets, log lines) can be told
/// apart from the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunId(Uuid);

impl RunId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[inline]
    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }
}

/// Short form (first eight hex digits), enough to tell runs apart in logs.
impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let simple = self.0.simple().to_string();
        f.write_str(&simple[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_display_is_short() {
        assert_eq!(RunId::new().to_string().len(), 8);
    }
}

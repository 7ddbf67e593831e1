//! Dial-code selection exposed by the phone country picker.

use tokio::sync::watch;

/// Capability of the external country picker next to the phone field.
///
/// Codes are digits only (`"420"`), `None` when nothing is selected.
pub trait DialCodeSource: Send + Sync {
    fn current(&self) -> Option<String>;

    /// Receiver that is notified on every selection change.
    fn changes(&self) -> watch::Receiver<Option<String>>;
}

/// Keeps only the digits of a dial code; `None` if there are none.
#[must_use]
pub fn normalize_dial_code(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

/// In-process picker backed by a `watch` channel.
#[derive(Debug)]
pub struct DialPicker {
    tx: watch::Sender<Option<String>>,
}

impl DialPicker {
    #[must_use]
    pub fn new(initial: Option<&str>) -> Self {
        let (tx, _) = watch::channel(initial.and_then(normalize_dial_code));
        Self { tx }
    }

    /// Selects a flag by its dial attribute, e.g. `"+421"`.
    pub fn select(&self, dial: &str) {
        self.set(normalize_dial_code(dial));
    }

    /// Selects a flag whose dial attribute may be missing, falling back to the
    /// digits of its visible label.
    pub fn select_flag(&self, dial_attr: Option<&str>, label: Option<&str>) {
        let code = dial_attr
            .and_then(normalize_dial_code)
            .or_else(|| label.and_then(normalize_dial_code));
        self.set(code);
    }

    pub fn clear(&self) {
        self.set(None);
    }

    fn set(&self, code: Option<String>) {
        tracing::debug!(dial = ?code, "dial code selected");
        self.tx.send_replace(code);
    }
}

impl DialCodeSource for DialPicker {
    fn current(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    fn changes(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

use shared::domain::StatusValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub background: &'static str,
    pub text: &'static str,
}

impl CellStyle {
    pub fn css(&self) -> String {
        format!("background-color: {}; color: {};", self.background, self.text)
    }
}

/// Table cell colouring. Empty or unrecognised cells stay unstyled.
pub fn cell_style(status: Option<StatusValue>) -> Option<CellStyle> {
    let style = match status? {
        StatusValue::Open => CellStyle {
            background: "#333333",
            text: "white",
        },
        StatusValue::InProgress => CellStyle {
            background: "yellow",
            text: "black",
        },
        StatusValue::Finished => CellStyle {
            background: "#90EE90",
            text: "#006400",
        },
    };
    Some(style)
}

/// Scorecard colouring; `None` is the neutral "total" card.
pub fn scorecard_style(status: Option<StatusValue>) -> CellStyle {
    match status {
        Some(StatusValue::Open) => CellStyle {
            background: "#444444",
            text: "white",
        },
        Some(StatusValue::InProgress) => CellStyle {
            background: "#FFFFCC",
            text: "black",
        },
        Some(StatusValue::Finished) => CellStyle {
            background: "#C8E6C9",
            text: "#006400",
        },
        None => CellStyle {
            background: "#E0E0E0",
            text: "black",
        },
    }
}

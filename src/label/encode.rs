use crate::foundation::core::BoundingBox;

/// Class id emitted for the single object class of this generator.
pub const DEFAULT_CLASS_ID: u32 = 0;

/// One detector label: class plus box centre and size as fractions of the canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Label {
    pub class_id: u32,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl Label {
    /// `<class> <cx> <cy> <w> <h>` with six decimals per number, no trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.cx, self.cy, self.w, self.h
        )
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Result of encoding a box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum LabelOutcome {
    Label(Label),
    /// Clamping left no positive area; no label content is produced.
    Rejected,
}

impl LabelOutcome {
    pub fn label(&self) -> Option<&Label> {
        match self {
            Self::Label(l) => Some(l),
            Self::Rejected => None,
        }
    }

    /// Label file contents: one line plus newline, or empty when rejected.
    pub fn file_contents(&self) -> String {
        match self {
            Self::Label(l) => format!("{}\n", l.to_line()),
            Self::Rejected => String::new(),
        }
    }
}

/// Clamp `bbox` into `[0, canvas_size]` and normalize it.
pub fn encode(bbox: BoundingBox, canvas_size: u32, class_id: u32) -> LabelOutcome {
    let size = f64::from(canvas_size);
    let b = bbox.clamped(size);
    if canvas_size == 0 || !b.is_valid() {
        return LabelOutcome::Rejected;
    }
    LabelOutcome::Label(Label {
        class_id,
        cx: (b.x1 + b.x2) / 2.0 / size,
        cy: (b.y1 + b.y2) / 2.0 / size,
        w: b.width() / size,
        h: b.height() / size,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/label/encode.rs"]
mod tests;

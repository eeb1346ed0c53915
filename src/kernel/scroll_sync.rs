//! Maps editor lines to preview scroll offsets and back.
//!
//! The preview exposes one anchor per rendered block that knows its source
//! line. Anchors are cached until the preview re-renders; a content change
//! only marks the cache stale.

/// A rendered block: the source line it starts at and its vertical extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub line: u32,
    pub top: f64,
    pub height: f64,
}

impl Anchor {
    pub const TOP: Anchor = Anchor {
        line: 0,
        top: 0.0,
        height: 0.0,
    };

    pub fn new(line: u32, top: f64, height: f64) -> Self {
        Self { line, top, height }
    }
}

/// Geometry of the rendered preview.
pub trait AnchorSource {
    fn anchors(&self) -> Vec<Anchor>;
}

impl AnchorSource for Vec<Anchor> {
    fn anchors(&self) -> Vec<Anchor> {
        self.clone()
    }
}

#[derive(Debug, Clone)]
pub struct ScrollSync {
    anchors: Vec<Anchor>,
    stale: bool,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollSync {
    pub fn new() -> Self {
        Self {
            anchors: vec![Anchor::TOP],
            stale: true,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn rebuild(&mut self, source: &dyn AnchorSource) {
        let mut anchors = source.anchors();
        anchors.sort_by_key(|a| a.line);
        anchors.dedup_by_key(|a| a.line);

        self.anchors.clear();
        self.anchors.push(Anchor::TOP);
        self.anchors
            .extend(anchors.into_iter().filter(|a| a.line > 0));
        self.stale = false;
    }

    fn ensure(&mut self, source: &dyn AnchorSource) {
        if self.stale {
            self.rebuild(source);
        }
    }

    pub fn sync_to_line(&mut self, source: &dyn AnchorSource, line: f64) -> f64 {
        self.ensure(source);
        self.line_to_offset(line)
    }

    pub fn sync_to_offset(&mut self, source: &dyn AnchorSource, offset: f64) -> f64 {
        self.ensure(source);
        self.offset_to_line(offset)
    }

    pub fn line_to_offset(&self, line: f64) -> f64 {
        if !(line > 0.0) {
            return 0.0;
        }
        let floor = line.floor();
        let idx = self
            .anchors
            .partition_point(|a| f64::from(a.line) <= floor);
        let Some(prev) = idx.checked_sub(1).and_then(|i| self.anchors.get(i)) else {
            return 0.0;
        };
        // An exact hit has no bracketing partner.
        let next = if f64::from(prev.line) == floor {
            None
        } else {
            self.anchors.get(idx)
        };

        match next {
            Some(next) => {
                let span = f64::from(next.line - prev.line);
                let ratio = (line - f64::from(prev.line)) / span;
                prev.top + ratio * (next.top - prev.top)
            }
            None => prev.top + prev.height * line.fract(),
        }
    }

    pub fn offset_to_line(&self, offset: f64) -> f64 {
        if !(offset > 0.0) {
            return 0.0;
        }
        let idx = self.anchors.partition_point(|a| a.top <= offset);
        let Some(prev) = idx.checked_sub(1).and_then(|i| self.anchors.get(i)) else {
            return 0.0;
        };

        match self.anchors.get(idx) {
            Some(next) if next.top > prev.top => {
                let ratio = (offset - prev.top) / (next.top - prev.top);
                f64::from(prev.line) + ratio * f64::from(next.line - prev.line)
            }
            _ if prev.height > 0.0 && offset < prev.top + prev.height => {
                f64::from(prev.line) + (offset - prev.top) / prev.height
            }
            _ => f64::from(prev.line),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/scroll_sync.rs"]
mod tests;

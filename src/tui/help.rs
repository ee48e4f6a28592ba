//! Help screen — modal overlay showing the key and mouse reference.

/// A line in the help screen.
#[derive(Debug, Clone)]
pub struct HelpLine {
    pub text: String,
    pub is_header: bool,
}

/// Help screen state.
#[derive(Debug, Clone)]
pub struct HelpScreen {
    pub visible: bool,
    pub scroll_offset: usize,
    content: Vec<HelpLine>,
}

impl HelpScreen {
    /// Reference for the local surface, or the remote one with connection keys.
    pub fn new(remote: bool) -> Self {
        Self {
            visible: false,
            scroll_offset: 0,
            content: Self::build_content(remote),
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.scroll_offset = 0;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self, max_visible: usize) {
        let max_scroll = self.content.len().saturating_sub(max_visible);
        if self.scroll_offset < max_scroll {
            self.scroll_offset += 1;
        }
    }

    pub fn lines(&self) -> &[HelpLine] {
        &self.content
    }

    fn build_content(remote: bool) -> Vec<HelpLine> {
        let mut lines = Vec::new();

        let h = |text: &str| HelpLine {
            text: text.to_string(),
            is_header: true,
        };
        let l = |text: &str| HelpLine {
            text: text.to_string(),
            is_header: false,
        };

        lines.push(h("EFFECTS"));
        lines.push(l("  1-4          Generative: waves, chladni, burst, quantum"));
        lines.push(l("  5-7          Camera reactive: distort, depth, face"));
        lines.push(l(""));

        lines.push(h("COLOR & MUSIC"));
        lines.push(l("  r / g / b    Select the channel the RGB knob edits"));
        lines.push(l("  p / s        Send play / pause to the visualizer"));
        lines.push(l(""));

        lines.push(h("KNOBS"));
        lines.push(l("  Tab          Focus next knob"));
        lines.push(l("  Shift-Tab    Focus previous knob"));
        lines.push(l("  Up / Right   Nudge focused knob up (+)"));
        lines.push(l("  Down / Left  Nudge focused knob down (-)"));
        lines.push(l("  Shift-arrow  Nudge by ten steps"));
        lines.push(l(""));

        lines.push(h("MOUSE"));
        lines.push(l("  Click        Press a button"));
        lines.push(l("  Drag knob    Point where the indicator should go"));
        lines.push(l(""));

        if remote {
            lines.push(h("REMOTE"));
            lines.push(l("  c            Open the connection form"));
            lines.push(l("  d            Disconnect"));
            lines.push(l("  Enter        Connect (in form)"));
            lines.push(l(""));
        }

        lines.push(h("GENERAL"));
        lines.push(l("  Ctrl-L       Event log"));
        lines.push(l("  Ctrl-T       Cycle theme"));
        lines.push(l("  ?            Toggle this help"));
        lines.push(l("  Esc          Close overlay"));
        lines.push(l("  q / Ctrl-Q   Shut down visualizer and quit"));

        lines
    }
}

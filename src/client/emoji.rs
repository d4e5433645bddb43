use emojic::text::parse_text;

/// Where a pointer-down landed relative to the emoji picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Picker,
    ToggleButton,
    Outside,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EmojiPicker {
    visible: bool,
}

impl EmojiPicker {
    pub fn is_visible(self) -> bool {
        self.visible
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn on_pointer_down(&mut self, target: PointerTarget) {
        if target == PointerTarget::Outside {
            self.visible = false;
        }
    }
}

/// Replaces `:shortcode:` sequences with their glyphs.
pub fn expand_shortcodes(text: &str) -> String {
    parse_text(text)
}

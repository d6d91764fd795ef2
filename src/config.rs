//! Options for a [`DragEventDispatcher`](crate::DragEventDispatcher).

bitflags::bitflags! {
    /// Which input devices may start a drag.
    ///
    /// Controls the press listeners attached to the target element. Move and
    /// release listeners on the document are always attached for both
    /// devices while a session is open.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InputSources: u8 {
        const MOUSE = 1 << 0;
        const TOUCH = 1 << 1;
    }
}

impl Default for InputSources {
    fn default() -> Self {
        Self::all()
    }
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragOptions {
    /// Devices whose press starts a session.
    pub sources: InputSources,
    /// Suppress the default action of press and move input (text selection,
    /// native touch scrolling).
    pub prevent_default: bool,
}

impl Default for DragOptions {
    fn default() -> Self {
        Self {
            sources: InputSources::default(),
            prevent_default: true,
        }
    }
}

impl DragOptions {
    pub fn with_sources(mut self, sources: InputSources) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_prevent_default(mut self, prevent_default: bool) -> Self {
        self.prevent_default = prevent_default;
        self
    }
}

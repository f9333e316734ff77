//! Which invalidations a property change fires.
//!
//! Every layout-relevant view property carries one of the descriptors
//! below. They are the single source of truth for invalidation fan-out:
//!
//! | Property | Influence |
//! |---|---|
//! | visible | none |
//! | margin | parent preferred size |
//! | padding | own preferred size, own layout, parent preferred size |
//! | horizontal / vertical alignment | parent layout |
//! | preferred size minimum / maximum / hint | own preferred size, parent preferred size |
//! | position / size | own layout |

/// A set of invalidations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Influence {
    pub own_preferred_size: bool,
    pub own_layout: bool,
    pub parent_preferred_size: bool,
    pub parent_layout: bool,
}

impl Influence {
    pub const NONE: Self = Self {
        own_preferred_size: false,
        own_layout: false,
        parent_preferred_size: false,
        parent_layout: false,
    };

    #[must_use]
    pub const fn own_preferred_size(mut self) -> Self {
        self.own_preferred_size = true;
        self
    }

    #[must_use]
    pub const fn own_layout(mut self) -> Self {
        self.own_layout = true;
        self
    }

    #[must_use]
    pub const fn parent_preferred_size(mut self) -> Self {
        self.parent_preferred_size = true;
        self
    }

    #[must_use]
    pub const fn parent_layout(mut self) -> Self {
        self.parent_layout = true;
        self
    }

    pub const fn is_none(&self) -> bool {
        !(self.own_preferred_size
            || self.own_layout
            || self.parent_preferred_size
            || self.parent_layout)
    }

    /// Whether the parent has to be notified at all.
    pub const fn touches_parent(&self) -> bool {
        self.parent_preferred_size || self.parent_layout
    }
}

pub const VISIBLE: Influence = Influence::NONE;

pub const MARGIN: Influence = Influence::NONE.parent_preferred_size();

pub const PADDING: Influence = Influence::NONE
    .own_preferred_size()
    .own_layout()
    .parent_preferred_size();

pub const ALIGNMENT: Influence = Influence::NONE.parent_layout();

pub const PREFERRED_SIZE_CONSTRAINT: Influence = Influence::NONE
    .own_preferred_size()
    .parent_preferred_size();

/// Position and size, committed by `adjust_and_set_bounds`.
pub const BOUNDS: Influence = Influence::NONE.own_layout();

/// Content such as a label's text; the coordinator carries a resulting size
/// change to the parent.
pub const CONTENT: Influence = Influence::NONE.own_preferred_size();

/// Scroll view scrolling flags.
pub const SCROLLING: Influence = Influence::NONE.own_preferred_size().own_layout();

/// Primary axis of a linear layout.
pub const ORIENTATION: Influence = Influence::NONE.own_preferred_size().own_layout();

/// Properties with no layout relevance, such as a window title.
pub const COSMETIC: Influence = Influence::NONE;

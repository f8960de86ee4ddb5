//! Keyboard focus cycling and the modal focus trap.

/// Moves focus one step through `controls`, wrapping at both ends.
///
/// When `current` is not among `controls` (or is `None`), focus lands on the
/// first control, or the last one when moving backwards.
#[must_use]
pub fn cycle<T: Copy + PartialEq>(controls: &[T], current: Option<T>, backwards: bool) -> Option<T> {
    let position = current.and_then(|c| controls.iter().position(|&x| x == c));
    let len = controls.len();
    let target = match (position, backwards) {
        (_, _) if len == 0 => return None,
        (None, false) => 0,
        (None, true) => len.saturating_sub(1),
        (Some(i), false) => i.saturating_add(1) % len,
        (Some(i), true) => i.checked_sub(1).unwrap_or(len.saturating_sub(1)),
    };
    controls.get(target).copied()
}

/// Focus state of an open dialog.
///
/// Remembers which control held focus before the dialog opened and keeps
/// focus inside the dialog's own controls until it closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap<R, C> {
    restore: R,
    current: Option<C>,
}

impl<R: Copy, C: Copy + PartialEq> FocusTrap<R, C> {
    /// Captures `restore` and focuses the first of `controls`.
    pub fn open(restore: R, controls: &[C]) -> Self {
        Self {
            restore,
            current: controls.first().copied(),
        }
    }

    /// Focused control inside the dialog.
    pub const fn current(&self) -> Option<C> {
        self.current
    }

    /// Tab / Shift+Tab inside the dialog.
    ///
    /// `controls` is re-read on every call since dialog content can change
    /// while it is open.
    pub fn cycle(&mut self, controls: &[C], backwards: bool) {
        self.current = cycle(controls, self.current, backwards);
    }

    /// Drops focus that no longer points at an existing control.
    pub fn revalidate(&mut self, controls: &[C]) {
        if self.current.is_none_or(|c| !controls.contains(&c)) {
            self.current = controls.first().copied();
        }
    }

    /// Closes the trap, returning the control to refocus.
    pub const fn close(self) -> R {
        self.restore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Outside {
        Grid,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Inside {
        Close,
        Poster,
        Trailer,
    }

    const ALL: [Inside; 3] = [Inside::Close, Inside::Poster, Inside::Trailer];

    #[test]
    fn test_cycle_forward_wraps_last_to_first() {
        // Arrange & Act & Assert
        assert_eq!(cycle(&ALL, Some(Inside::Poster), false), Some(Inside::Trailer));
        assert_eq!(cycle(&ALL, Some(Inside::Trailer), false), Some(Inside::Close));
    }

    #[test]
    fn test_cycle_backward_wraps_first_to_last() {
        // Arrange & Act & Assert
        assert_eq!(cycle(&ALL, Some(Inside::Poster), true), Some(Inside::Close));
        assert_eq!(cycle(&ALL, Some(Inside::Close), true), Some(Inside::Trailer));
    }

    #[test]
    fn test_cycle_from_unknown_focus() {
        // Arrange
        let controls = [Inside::Close, Inside::Poster];

        // Act & Assert
        assert_eq!(cycle(&controls, Some(Inside::Trailer), false), Some(Inside::Close));
        assert_eq!(cycle(&controls, None, true), Some(Inside::Poster));
    }

    #[test]
    fn test_cycle_with_no_controls() {
        // Arrange & Act & Assert
        assert_eq!(cycle::<Inside>(&[], Some(Inside::Close), false), None);
    }

    #[test]
    fn test_cycle_single_control_stays() {
        // Arrange & Act & Assert
        assert_eq!(
            cycle(&[Inside::Close], Some(Inside::Close), false),
            Some(Inside::Close)
        );
        assert_eq!(
            cycle(&[Inside::Close], Some(Inside::Close), true),
            Some(Inside::Close)
        );
    }

    #[test]
    fn test_trap_focuses_first_and_restores_on_close() {
        // Arrange
        let mut trap = FocusTrap::open(Outside::Grid, &ALL);
        assert_eq!(trap.current(), Some(Inside::Close));

        // Act
        trap.cycle(&ALL, true);
        let focused = trap.current();
        let restored = trap.close();

        // Assert
        assert_eq!(focused, Some(Inside::Trailer));
        assert_eq!(restored, Outside::Grid);
    }

    #[test]
    fn test_trap_picks_up_controls_added_after_open() {
        // Arrange: only the close button exists while loading
        let mut trap = FocusTrap::open(Outside::Grid, &[Inside::Close]);

        // Act
        trap.cycle(&ALL, false);

        // Assert
        assert_eq!(trap.current(), Some(Inside::Poster));
    }

    #[test]
    fn test_revalidate_after_control_disappears() {
        // Arrange
        let mut trap = FocusTrap::open(Outside::Grid, &ALL);
        trap.cycle(&ALL, true);

        // Act
        trap.revalidate(&[Inside::Close, Inside::Poster]);

        // Assert
        assert_eq!(trap.current(), Some(Inside::Close));
    }
}

use crate::error::DriverError;

// ============================================================================
// Driver capability: the browser primitives the fixture relies on
// ============================================================================

/// Locator-based browser primitives.
///
/// Implementations own their wait/timeout semantics; callers never retry.
/// A `false` return means the driver completed the call but reported that the
/// element could not be acted on; transport or protocol failures are `Err`.
pub trait Driver {
    fn click(&mut self, locator: &str) -> Result<bool, DriverError>;

    fn type_text(&mut self, locator: &str, text: &str) -> Result<bool, DriverError>;

    fn get_text(&mut self, locator: &str) -> Result<String, DriverError>;

    fn is_visible(&mut self, locator: &str) -> Result<bool, DriverError>;

    fn exists(&mut self, locator: &str) -> Result<bool, DriverError>;

    fn wait_for_element(&mut self, locator: &str) -> Result<bool, DriverError>;
}

/// Page-level navigation, kept apart from [`Driver`] because widget
/// resolution never needs it.
pub trait Navigator {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Switch into the iframe with the given id, or back to the top-level
    /// document with `None`.
    fn select_frame(&mut self, frame: Option<&str>) -> Result<(), DriverError>;
}

impl<T: Driver + ?Sized> Driver for &mut T {
    fn click(&mut self, locator: &str) -> Result<bool, DriverError> {
        (**self).click(locator)
    }

    fn type_text(&mut self, locator: &str, text: &str) -> Result<bool, DriverError> {
        (**self).type_text(locator, text)
    }

    fn get_text(&mut self, locator: &str) -> Result<String, DriverError> {
        (**self).get_text(locator)
    }

    fn is_visible(&mut self, locator: &str) -> Result<bool, DriverError> {
        (**self).is_visible(locator)
    }

    fn exists(&mut self, locator: &str) -> Result<bool, DriverError> {
        (**self).exists(locator)
    }

    fn wait_for_element(&mut self, locator: &str) -> Result<bool, DriverError> {
        (**self).wait_for_element(locator)
    }
}

impl<T: Navigator + ?Sized> Navigator for &mut T {
    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        (**self).navigate(url)
    }

    fn select_frame(&mut self, frame: Option<&str>) -> Result<(), DriverError> {
        (**self).select_frame(frame)
    }
}

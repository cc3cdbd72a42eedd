use std::borrow::Cow;

/// Short display name of a value, such as a controller state or a UI
/// trigger. Used in `tracing` fields and status lines.
///
/// `#[derive(Label)]` (feature `macros`) returns the variant name for enums
/// and the type name for structs.
pub trait Label {
    fn label(&self) -> Cow<'static, str>;
}

impl<T: Label + ?Sized> Label for &T {
    fn label(&self) -> Cow<'static, str> {
        (**self).label()
    }
}

impl<T: Label + ?Sized> Label for Box<T> {
    fn label(&self) -> Cow<'static, str> {
        (**self).label()
    }
}

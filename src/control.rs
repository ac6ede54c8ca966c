//! Control kinds and their read/write strategies.
//!
//! A [`ControlBinding`] pairs a DOM element with the [`ControlKind`] derived
//! from its tag name and input type at the moment of the call. Nothing about
//! the binding is stored; the kind is recomputed for every read or write so a
//! control whose type changes between saves is handled by its current kind.

#[cfg(test)]
#[path = "control_test.rs"]
mod control_test;

use crate::consts::TEXT_LIKE_INPUT_TYPES;
use crate::doc::FieldValue;
use crate::ports::Dom;

/// How a control's state is read and restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// `<select>`: value string, change event on restore.
    Select,
    /// `<textarea>`: value string, no change event on restore.
    TextArea,
    /// `<input>` of type text, number, tel or email: value string, change event on restore.
    TextLikeInput,
    /// `<input>` of type checkbox or radio: checked state, change event on restore.
    CheckboxOrRadio,
    /// Anything else. Never read, never written.
    Unsupported,
}

impl ControlKind {
    /// Classify an element by upper-case tag name and lower-case input type.
    #[must_use]
    pub fn classify(tag_name: &str, input_type: Option<&str>) -> Self {
        match tag_name {
            "SELECT" => Self::Select,
            "TEXTAREA" => Self::TextArea,
            "INPUT" => match input_type.unwrap_or("text") {
                t if TEXT_LIKE_INPUT_TYPES.contains(&t) => Self::TextLikeInput,
                "checkbox" | "radio" => Self::CheckboxOrRadio,
                _ => Self::Unsupported,
            },
            _ => Self::Unsupported,
        }
    }

    /// Whether restoring a value notifies other listeners with a change event.
    #[must_use]
    pub fn fires_change_on_write(self) -> bool {
        matches!(self, Self::Select | Self::TextLikeInput | Self::CheckboxOrRadio)
    }
}

/// An element together with its current [`ControlKind`].
pub struct ControlBinding<'a, D: Dom> {
    dom: &'a D,
    element: &'a D::Element,
    kind: ControlKind,
}

impl<'a, D: Dom> ControlBinding<'a, D> {
    /// Derive the binding for `element` from its tag and input type.
    pub fn new(dom: &'a D, element: &'a D::Element) -> Self {
        let tag = dom.tag_name(element);
        let input_type = dom.input_type(element);
        let kind = ControlKind::classify(&tag, input_type.as_deref());
        Self { dom, element, kind }
    }

    #[must_use]
    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    /// The element's id; empty ids never participate in caching.
    #[must_use]
    pub fn id(&self) -> String {
        self.dom.id(self.element)
    }

    /// Current state of the control, `None` for unsupported controls.
    #[must_use]
    pub fn read(&self) -> Option<FieldValue> {
        match self.kind {
            ControlKind::Select | ControlKind::TextArea | ControlKind::TextLikeInput => {
                Some(FieldValue::Text(self.dom.value(self.element)))
            }
            ControlKind::CheckboxOrRadio => Some(FieldValue::Flag(self.dom.checked(self.element))),
            ControlKind::Unsupported => None,
        }
    }

    /// Push a cached value into the control.
    ///
    /// Returns `false` for unsupported controls, which are left untouched.
    pub fn write(&self, value: &FieldValue) -> bool {
        match self.kind {
            ControlKind::Select | ControlKind::TextArea | ControlKind::TextLikeInput => {
                self.dom.set_value(self.element, &value.as_text());
            }
            ControlKind::CheckboxOrRadio => self.dom.set_checked(self.element, value.as_checked()),
            ControlKind::Unsupported => return false,
        }
        if self.kind.fires_change_on_write() {
            self.dom.dispatch_change(self.element);
        }
        true
    }
}

//! Helper constructors for the common HTML element tags, mirroring the
//! fluent builder surface of the source toolkit.
//!
//! ```
//! use ripple_core::vnode::tags::{button, div};
//!
//! let view = div()
//!     .class("toolbar")
//!     .child(button().text("Save"));
//! assert_eq!(view.tag(), "div");
//! ```

use super::VElement;

macro_rules! tag_constructors {
    ($($name:ident => $tag:literal),* $(,)?) => {
        $(
            #[doc = concat!("A `<", $tag, ">` element builder.")]
            pub fn $name() -> VElement {
                VElement::new($tag)
            }
        )*
    };
}

tag_constructors! {
    div => "div",
    span => "span",
    p => "p",
    h1 => "h1",
    h2 => "h2",
    h3 => "h3",
    h4 => "h4",
    h5 => "h5",
    h6 => "h6",
    button => "button",
    input => "input",
    textarea => "textarea",
    select => "select",
    option => "option",
    ul => "ul",
    ol => "ol",
    li => "li",
    section => "section",
    header => "header",
    footer => "footer",
    main => "main",
    nav => "nav",
    article => "article",
    aside => "aside",
    form => "form",
    label => "label",
    a => "a",
    img => "img",
    br => "br",
    hr => "hr",
}

//! Description-building macros
//!
//! `h!` is the variadic form of [`node::h`](crate::node::h): children may be
//! any mix of elements, nodes, primitives and `Option`s of those.
//!
//! ```ignore
//! let view = h!("div", { "id" => "x", "hidden" => false },
//!     h!("h1", {}, "Title"),
//!     count,
//!     logged_in.then(|| h!("button", { "onclick" => logout.clone() }, "Log out")),
//! );
//! ```

/// Build a [`Props`](crate::attr::Props) list from `key => value` pairs
///
/// Later pairs overwrite earlier ones with the same key.
#[macro_export]
macro_rules! props {
    () => {
        $crate::attr::Props::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::attr::Props::new();
        $( $crate::attr::PropsExt::set_prop(&mut props, $key, $value); )+
        props
    }};
}

/// Build a [`Node`](crate::node::Node) from a tag, props and variadic children
///
/// Props are either an inline `{ key => value, .. }` list or any expression
/// evaluating to [`Props`](crate::attr::Props).
#[macro_export]
macro_rules! h {
    ($tag:expr) => {
        $crate::node::Node::from($crate::node::Element::new($tag))
    };
    ($tag:expr, { $($key:expr => $value:expr),* $(,)? } $(, $child:expr)* $(,)?) => {
        $crate::node::Node::from(
            $crate::node::Element::new($tag)
                .with_props($crate::props!($($key => $value),*))
                $(.child($child))*
        )
    };
    ($tag:expr, $props:expr $(, $child:expr)* $(,)?) => {
        $crate::node::Node::from(
            $crate::node::Element::new($tag)
                .with_props($props)
                $(.child($child))*
        )
    };
}

/// Builds a [`Node`](crate::Node) tree from S-expression-like syntax.
///
/// - `(name child ...)` becomes a list
/// - identifiers become tokens
/// - string literals become quoted strings, other literals become tokens
/// - `{expr}` inserts anything convertible with `Node::from`
///
/// # Examples
///
/// ```rust
/// use serde_sexpr::{sexpr, render, Node};
///
/// let uuid = "2b0b3f3e-3a4c-4b4f-9c5d-0a1b2c3d4e5f";
/// let pin = sexpr!((pin {Node::token(uuid)} (name "1") (length 2.54) (visible true)));
///
/// assert_eq!(
///     render(&pin),
///     "(pin 2b0b3f3e-3a4c-4b4f-9c5d-0a1b2c3d4e5f (name \"1\") (length 2.54) (visible true))\n"
/// );
/// ```
#[macro_export]
macro_rules! sexpr {
    // Nested list
    (@child ($($inner:tt)+)) => {
        $crate::sexpr!(($($inner)+))
    };

    // Interpolated expression
    (@child {$value:expr}) => {
        $crate::Node::from($value)
    };

    // Bareword
    (@child $token:ident) => {
        $crate::Node::token(stringify!($token))
    };

    // String or number literal
    (@child $literal:literal) => {
        $crate::Node::from($literal)
    };

    (($name:ident $($child:tt)*)) => {{
        #[allow(unused_mut)]
        let mut list = $crate::List::new(stringify!($name));
        $(
            list.append($crate::sexpr!(@child $child));
        )*
        $crate::Node::List(list)
    }};
}

//! Macros for ergonomic state machine construction.

/// Generate a state enum and its `State` implementation.
///
/// Every variant may carry a display name with `=> "name"`; it is used both
/// by [`State::name`](crate::core::State::name) and as the serialized form,
/// so JSON configurations can use it directly. Without one, the variant
/// identifier is used.
///
/// # Example
///
/// ```
/// use engineering::core::State;
/// use engineering::state_enum;
///
/// state_enum! {
///     pub enum Connection {
///         Connected => "connected",
///         Connecting => "connecting",
///         Disconnected => "disconnected",
///     }
/// }
///
/// assert_eq!(Connection::Connecting.name(), "connecting");
/// assert_eq!(serde_json::to_string(&Connection::Connected).unwrap(), "\"connected\"");
/// ```
#[macro_export]
macro_rules! state_enum {
    (@name $variant:ident) => {
        stringify!($variant)
    };
    (@name $variant:ident $label:literal) => {
        $label
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(=> $label:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $(#[serde(rename = $label)])?
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $crate::state_enum!(@name $variant $($label)?)),*
                }
            }
        }
    };
}

//! Text-backed status enums.
//!
//! Statuses are stored as `TEXT` columns guarded by `CHECK` constraints, so
//! each enum round-trips through its wire string via `as_str` / `FromStr`
//! and serializes to the same string in API responses.

macro_rules! define_text_status {
    (
        $(#[$meta:meta])*
        $name:ident ($entity:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $text:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text $(, alias = $alias)*)]
                $variant
            ),+
        }

        impl $name {
            /// Entity name used in transition error messages.
            pub const ENTITY: &'static str = $entity;

            /// The stored / serialized string for this status.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            /// Every variant, in declaration order.
            pub fn all() -> &'static [Self] {
                &[ $( Self::$variant ),+ ]
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text $(| $alias)* => Ok(Self::$variant), )+
                    other => Err(format!("Unknown {} status '{other}'", $entity)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

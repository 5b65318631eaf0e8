//! Closed string enumerations shared by the wire format and the database.
//!
//! Each variant maps to exactly one text value. The same text is used for
//! serde, for `Display`, and for the `TEXT` columns in PostgreSQL, so a value
//! read back from storage always parses with `FromStr`.

/// Declares a fieldless enum whose variants are spelled as fixed strings.
macro_rules! text_enum {
    // ---
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            pub fn as_str(&self) -> &'static str {
                // ---
                match self {
                    $( $name::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = anyhow::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // ---
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(anyhow::anyhow!(
                        "unknown {} value: {}",
                        stringify!($name),
                        other
                    )),
                }
            }
        }
    };
}

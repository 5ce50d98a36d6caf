//! Macros to reduce boilerplate in the codebase

/// Generate `as_str`, `Display` and a case-insensitive `FromStr` for a
/// fieldless enum.
///
/// # Usage
///
/// ```rust,ignore
/// enum_str!(
///     SortDirection,
///     "sort direction",
///     {
///         Ascending => "asc",
///         Descending => "desc",
///     }
/// );
/// ```
#[macro_export]
macro_rules! enum_str {
    (
        $enum_name:ident,
        $label:literal,
        { $($variant:ident => $str:literal),+ $(,)? }
    ) => {
        impl $enum_name {
            /// All valid string representations of this enum.
            pub const ALL_STRINGS: &[&str] = &[$($str),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($enum_name::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::error::RbacError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok($enum_name::$variant);
                    }
                )+
                Err($crate::error::RbacError::InvalidValue(
                    $label,
                    s.to_string(),
                    Self::ALL_STRINGS.join(", "),
                ))
            }
        }
    };
}

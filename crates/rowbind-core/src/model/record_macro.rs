//! Declarative record definition
//!
//! `record!` defines a struct and implements `Record` for it. Each field's
//! written Rust type becomes its native type name, so the Type Mapper sees
//! exactly what the struct declares. Field types must implement `Clone`,
//! `Into<Value>` and `FromValue`.

/// Define a mapped record type.
///
/// ```
/// use rowbind_core::{record, Record};
///
/// record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct WebPage {
///         pub url: String,
///         pub visits: i64,
///         pub title: Option<String>,
///     }
///     key = url
/// }
///
/// let decl = WebPage::declaration();
/// assert_eq!(decl.type_name, "WebPage");
/// assert_eq!(decl.key.as_deref(), Some("url"));
/// assert_eq!(decl.fields.len(), 3);
/// ```
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty ),+ $(,)?
        }
        $( key = $key:ident )?
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$fmeta])* $fvis $field : $ty ),+
        }

        impl $crate::Record for $name {
            fn declaration() -> $crate::Declaration {
                let declaration = $crate::Declaration::new(stringify!($name))
                    $( .field(stringify!($field), stringify!($ty)) )+;
                $( let declaration = declaration.key(stringify!($key)); )?
                declaration
            }

            fn field(&self, name: &str) -> ::std::option::Option<$crate::Value> {
                match name {
                    $( stringify!($field) => ::std::option::Option::Some(
                        $crate::Value::from(::std::clone::Clone::clone(&self.$field)),
                    ), )+
                    _ => ::std::option::Option::None,
                }
            }

            fn set_field(&mut self, name: &str, value: $crate::Value) -> $crate::Result<()> {
                match name {
                    $( stringify!($field) => {
                        self.$field = $crate::model::value::convert::<$ty>(name, value)?;
                        ::std::result::Result::Ok(())
                    } )+
                    _ => ::std::result::Result::Err($crate::RowbindError::UnknownField {
                        type_name: ::std::string::String::from(stringify!($name)),
                        field: ::std::string::String::from(name),
                    }),
                }
            }

            fn from_row(mut row: $crate::Row) -> $crate::Result<Self> {
                ::std::result::Result::Ok(Self {
                    $( $field: row.take::<$ty>(stringify!($field))?, )+
                })
            }
        }
    };
}

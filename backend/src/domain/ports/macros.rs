//! `define_port_error!` declares a port's failure enum together with one
//! snake-case constructor per variant. Constructor arguments accept anything
//! convertible into the field type, so `UserRepositoryError::query("boom")`
//! works without an explicit `to_owned`.

macro_rules! define_port_error {
    (
        $(#[$attr:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_attr:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $display:literal
            ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_attr])*
                #[error($display)]
                $variant $( { $($field: $ty),* } )?,
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    pub fn [<$variant:snake>]($($($field: impl Into<$ty>),*)?) -> Self {
                        Self::$variant { $($($field: $field.into()),*)? }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

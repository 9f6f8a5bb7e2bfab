//! `define_port_error!`: declares a port error enum with `thiserror`
//! messages and one snake_case constructor per variant.
//!
//! String-like fields take `impl Into<T>`, so adapters can write
//! `UserPersistenceError::query("database error")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[doc = "A [`Self::" $variant "`] error."]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            #[doc = "A [`Self::" $variant "`] error."]
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $(
                    #[doc = concat!("`", stringify!($field), "` reported with the failure.")]
                    $field : $ty
                ),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Constructor generation for port error enums.
    define_port_error! {
        pub enum LedgerPortError {
            Unavailable => "ledger unavailable",
            Rejected { reason: String } => "rejected: {reason}",
            Stale { user_id: i64 } => "stale claim for user {user_id}",
            Clash { username: String, attempts: u32 } => "{username} taken after {attempts} tries",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LedgerPortError::unavailable(), LedgerPortError::Unavailable);
    }

    #[test]
    fn string_fields_accept_str() {
        let err = LedgerPortError::rejected("locked");
        assert_eq!(err.to_string(), "rejected: locked");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = LedgerPortError::stale(7_i64);
        assert_eq!(err.to_string(), "stale claim for user 7");
    }

    #[test]
    fn mixed_fields_are_converted_in_order() {
        let err = LedgerPortError::clash("alice", 3_u32);
        assert_eq!(err.to_string(), "alice taken after 3 tries");
    }
}

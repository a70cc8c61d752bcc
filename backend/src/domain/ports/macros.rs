//! Helper macro for declaring port error enums.
//!
//! Each variant gets a snake_case constructor whose `String` fields accept
//! anything `Into<String>`, so adapters can write
//! `UserPersistenceError::query(err.to_string())`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
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
                $variant $( { $($field : $ty),* } )?,
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
    define_port_error! {
        pub enum SamplePortError {
            Offline => "store offline",
            Rejected { reason: String } => "rejected: {reason}",
            Throttled { reason: String, retry_after: u32 } => "throttled: {reason} ({retry_after}s)",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::offline(), SamplePortError::Offline);
        assert_eq!(SamplePortError::offline().to_string(), "store offline");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::rejected("duplicate");
        assert_eq!(err.to_string(), "rejected: duplicate");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SamplePortError::throttled("busy", 30_u32);
        assert_eq!(err.to_string(), "throttled: busy (30s)");
    }
}

/// Declares a service struct together with the trait naming its dependencies.
///
/// Every dependency becomes an associated type of the `Deps` trait and an
/// `Arc` field of the struct. The binary and the tests implement the `Deps`
/// trait once, with the real implementations or with mocks.
#[macro_export]
macro_rules! gen_service_impl {
    (
        $(#[$meta:meta])*
        struct $service_name:ident : $trait:path = $dependencies:ident {
            $($field_name:ident: $field_type:path = $field_attr:ident),*
        }
    ) => {
            pub trait $dependencies {
                type Context: Send + Sync + Clone + Eq + std::fmt::Debug + 'static;
                type Transaction: dao::Transaction + Send + Sync + Clone + std::fmt::Debug + 'static;
                $(
                    type $field_name: $field_type + Sync + Send;
                )*
            }

            $(#[$meta])*
            pub struct $service_name<Deps: $dependencies> {
                $(
                    pub $field_attr: std::sync::Arc<Deps::$field_name>,
                )*
            }

            impl<Deps: $dependencies> $service_name<Deps> {
                #[allow(clippy::too_many_arguments)]
                pub fn new($($field_attr: std::sync::Arc<Deps::$field_name>),*) -> Self {
                    Self { $($field_attr),* }
                }
            }
    };
}

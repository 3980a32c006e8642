//! Constructor-capture macros.
//!
//! Constructor-based registrations need two things reflection would
//! otherwise provide: the ordered parameter-type list and a callable that
//! builds the instance. These macros capture both at registration time
//! from an explicit constructor reference.

/// Captures a constructor for a concrete service type.
///
/// `constructor!(Ty { new(DepA, DepB) })` produces a
/// [`Constructor`](crate::Constructor) whose parameters are resolved by
/// type, in order, and passed to `Ty::new` as `Arc<DepA>, Arc<DepB>`.
///
/// # Examples
///
/// ```rust
/// use servitor::{constructor, ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
///
/// struct UserService { db: Arc<Database> }
///
/// impl UserService {
///     fn new(db: Arc<Database>) -> Self {
///         Self { db }
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_constructor(constructor!(UserService { new(Database) }));
///
/// let provider = services.build().unwrap();
/// let users = provider.get_required::<UserService>().unwrap();
/// assert_eq!(users.db.url, "postgres://localhost");
/// ```
#[macro_export]
macro_rules! constructor {
    ($ty:ty { $ctor:ident ( $($dep:ty),* $(,)? ) }) => {
        $crate::Constructor::new::<$ty>(
            ::std::vec![$($crate::key_of_type::<$dep>()),*],
            ::std::sync::Arc::new(|args: $crate::ResolvedArgs| {
                let mut args = args;
                let _ = &mut args;
                ::std::result::Result::Ok(
                    ::std::sync::Arc::new(<$ty>::$ctor($(args.take::<$dep>()?),*))
                        as $crate::AnyArc,
                )
            }),
        )
    };
}

/// Captures a fallible constructor for a concrete service type.
///
/// Like [`constructor!`], but the constructor returns
/// `Result<Ty, E>`; an `Err` surfaces as
/// [`DiError::InstantiationFailed`](crate::DiError::InstantiationFailed)
/// with the original error attached as the cause.
///
/// # Examples
///
/// ```rust
/// use servitor::{try_constructor, ServiceCollection};
///
/// struct Port(u16);
///
/// impl Port {
///     fn parse() -> Result<Self, std::num::ParseIntError> {
///         "8080".parse().map(Port)
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton_constructor(try_constructor!(Port { parse() }));
/// ```
#[macro_export]
macro_rules! try_constructor {
    ($ty:ty { $ctor:ident ( $($dep:ty),* $(,)? ) }) => {
        $crate::Constructor::new::<$ty>(
            ::std::vec![$($crate::key_of_type::<$dep>()),*],
            ::std::sync::Arc::new(|args: $crate::ResolvedArgs| {
                let mut args = args;
                let _ = &mut args;
                match <$ty>::$ctor($(args.take::<$dep>()?),*) {
                    ::std::result::Result::Ok(value) => ::std::result::Result::Ok(
                        ::std::sync::Arc::new(value) as $crate::AnyArc,
                    ),
                    ::std::result::Result::Err(err) => ::std::result::Result::Err(
                        ::std::sync::Arc::new(err) as $crate::BoxedCause,
                    ),
                }
            }),
        )
    };
}

/// Captures a constructor binding a concrete implementation to a
/// trait-object service.
///
/// `bound_constructor!(dyn Svc, Impl { new(Dep) })` constructs `Impl` and
/// registers it under the `dyn Svc` key; constructor parameters of other
/// services see `Impl` as their consuming type.
///
/// # Examples
///
/// ```rust
/// use servitor::{bound_constructor, ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct EnglishGreeter;
///
/// impl EnglishGreeter {
///     fn new() -> Self {
///         Self
///     }
/// }
///
/// impl Greeter for EnglishGreeter {
///     fn greet(&self) -> String {
///         "hello".to_string()
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton_constructor(bound_constructor!(dyn Greeter, EnglishGreeter { new() }));
///
/// let provider = services.build().unwrap();
/// let greeter = provider.get_required_trait::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
#[macro_export]
macro_rules! bound_constructor {
    ($svc:ty, $impl:ty { $ctor:ident ( $($dep:ty),* $(,)? ) }) => {
        $crate::Constructor::bound::<$svc, $impl>(
            ::std::vec![$($crate::key_of_type::<$dep>()),*],
            ::std::sync::Arc::new(|args: $crate::ResolvedArgs| {
                let mut args = args;
                let _ = &mut args;
                ::std::result::Result::Ok(
                    ::std::sync::Arc::new(
                        ::std::sync::Arc::new(<$impl>::$ctor($(args.take::<$dep>()?),*))
                            as ::std::sync::Arc<$svc>,
                    ) as $crate::AnyArc,
                )
            }),
        )
    };
}

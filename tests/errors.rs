use servitor::{constructor, DiError, DiResult, Resolver, ServiceCollection};
use std::error::Error;
use std::sync::Arc;

#[test]
fn test_error_display_not_found() {
    let error = DiError::NotFound("TestService");
    assert_eq!(format!("{}", error), "Service not found: TestService");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("std::string::String");
    assert_eq!(format!("{}", error), "Type mismatch for: std::string::String");
}

#[test]
fn test_error_display_missing_dependency() {
    let error = DiError::MissingDependency { dependent: "ServiceA", missing: "ServiceB" };
    let display_str = format!("{}", error);
    assert_eq!(display_str, "Missing dependency: ServiceA requires unregistered ServiceB");
    assert!(display_str.contains("ServiceA"));
    assert!(display_str.contains("ServiceB"));
}

#[test]
fn test_error_display_scoped_in_root() {
    let error = DiError::ScopedInRoot("RequestContext");
    let display_str = format!("{}", error);
    assert!(display_str.contains("RequestContext"));
    assert!(display_str.contains("root provider"));
}

#[test]
fn test_error_display_invalid_constructor_count() {
    let error = DiError::InvalidConstructorCount { service: "ServiceA", candidates: 3 };
    let display_str = format!("{}", error);
    assert!(display_str.contains("ServiceA"));
    assert!(display_str.contains("3"));
    assert!(display_str.contains("exactly one"));
}

#[test]
fn test_error_display_invalid_registration() {
    let error = DiError::InvalidRegistration {
        service: "ServiceA",
        reason: "an injection-only service requires an injection factory",
    };
    let display_str = format!("{}", error);
    assert!(display_str.contains("Invalid registration"));
    assert!(display_str.contains("ServiceA"));
    assert!(display_str.contains("injection factory"));
}

#[test]
fn test_error_display_injection_only_without_target() {
    let error = DiError::InjectionOnlyWithoutTarget("PerComponentLogger");
    let display_str = format!("{}", error);
    assert!(display_str.contains("PerComponentLogger"));
    assert!(display_str.contains("injection target"));
}

#[test]
fn test_instantiation_failed_exposes_cause() {
    #[derive(Debug)]
    struct Root;

    impl std::fmt::Display for Root {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "disk on fire")
        }
    }

    impl Error for Root {}

    let error = DiError::InstantiationFailed {
        service: "ServiceA",
        source: Some(Arc::new(Root)),
    };

    assert_eq!(format!("{}", error), "Failed to instantiate ServiceA: disk on fire");
    // The original failure is attached as the error source, never swallowed
    assert_eq!(error.source().expect("cause").to_string(), "disk on fire");

    let without_cause = DiError::InstantiationFailed { service: "ServiceA", source: None };
    assert!(without_cause.source().is_none());
}

#[test]
fn test_error_clone_and_debug() {
    let error = DiError::TypeMismatch("SomeType");
    let cloned = error.clone();
    assert_eq!(format!("{}", error), format!("{}", cloned));

    let debug_str = format!("{:?}", DiError::NotFound("TestService"));
    assert!(debug_str.contains("NotFound"));
    assert!(debug_str.contains("TestService"));
}

#[test]
fn test_diresult_round_trip() {
    let ok: DiResult<String> = Ok("success".to_string());
    assert!(ok.is_ok());

    let err: DiResult<String> = Err(DiError::NotFound("TestService"));
    match err {
        Err(DiError::NotFound(name)) => assert_eq!(name, "TestService"),
        _ => panic!("Expected NotFound error"),
    }
}

// ----- Injection-only services -----

struct ComponentLogger {
    owner: &'static str,
}

struct Worker {
    logger: Arc<ComponentLogger>,
}

impl Worker {
    fn new(logger: Arc<ComponentLogger>) -> Self {
        Self { logger }
    }
}

fn injection_collection() -> ServiceCollection {
    let mut sc = ServiceCollection::new();
    sc.add_injection_factory::<ComponentLogger, _>(|_, target| ComponentLogger {
        owner: target.display_name(),
    });
    sc.add_transient_constructor(constructor!(Worker { new(ComponentLogger) }));
    sc
}

#[test]
fn test_injection_factory_sees_the_consuming_type() {
    let sp = injection_collection().build().unwrap();

    let worker = sp.get_required::<Worker>().unwrap();
    assert!(worker.logger.owner.contains("Worker"));
}

#[test]
fn test_injection_only_cannot_be_resolved_directly() {
    let sp = injection_collection().build().unwrap();

    // Direct resolution has no consuming type: always the dedicated error,
    // from the root and from a scope alike.
    match sp.get::<ComponentLogger>() {
        Err(DiError::InjectionOnlyWithoutTarget(name)) => {
            assert!(name.contains("ComponentLogger"))
        }
        other => panic!("expected InjectionOnlyWithoutTarget, got {:?}", other.map(|_| ())),
    }

    let scope = sp.create_scope();
    assert!(matches!(
        scope.get::<ComponentLogger>(),
        Err(DiError::InjectionOnlyWithoutTarget(_))
    ));
}

#[test]
fn test_injection_only_is_never_cached() {
    let sp = injection_collection().build().unwrap();

    let w1 = sp.get_required::<Worker>().unwrap();
    let w2 = sp.get_required::<Worker>().unwrap();
    assert!(!Arc::ptr_eq(&w1.logger, &w2.logger));

    let scope = sp.create_scope();
    let w3 = scope.get_required::<Worker>().unwrap();
    let w4 = scope.get_required::<Worker>().unwrap();
    assert!(!Arc::ptr_eq(&w3.logger, &w4.logger));
}

// ----- Registration validation -----

#[test]
fn test_errors_propagate_to_the_original_caller() {
    struct Outer {
        _inner: Arc<Worker>,
    }

    impl Outer {
        fn new(inner: Arc<Worker>) -> Self {
            Self { _inner: inner }
        }
    }

    // Worker's ComponentLogger dependency is missing entirely
    let mut sc = ServiceCollection::new();
    sc.add_transient_constructor(constructor!(Worker { new(ComponentLogger) }));
    sc.add_transient_constructor(constructor!(Outer { new(Worker) }));

    let sp = sc.build().unwrap();

    // The failure three levels down reaches the top-level call unrecovered
    match sp.get::<Outer>() {
        Err(DiError::MissingDependency { dependent, missing }) => {
            assert!(dependent.contains("Worker"));
            assert!(missing.contains("ComponentLogger"));
        }
        other => panic!("expected MissingDependency, got {:?}", other.map(|_| ())),
    }
}

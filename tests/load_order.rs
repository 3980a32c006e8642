use servitor::{constructor, key_of_type, Key, ServiceCollection, ServiceDescriptor};
use std::sync::Arc;

struct LevelOne;

impl LevelOne {
    fn new() -> Self {
        Self
    }
}

struct LevelOneA;

impl LevelOneA {
    fn new() -> Self {
        Self
    }
}

struct LevelTwo;

impl LevelTwo {
    fn new(_a: Arc<LevelOne>, _b: Arc<LevelOneA>) -> Self {
        Self
    }
}

struct LevelThree;

impl LevelThree {
    fn new(_two: Arc<LevelTwo>) -> Self {
        Self
    }
}

struct LevelThreeA;

impl LevelThreeA {
    fn new(_two: Arc<LevelTwo>) -> Self {
        Self
    }
}

struct LevelFour;

impl LevelFour {
    fn new(_a: Arc<LevelThree>, _b: Arc<LevelThreeA>) -> Self {
        Self
    }
}

fn position(order: &[&ServiceDescriptor], key: &Key) -> usize {
    order
        .iter()
        .position(|d| d.key() == key)
        .unwrap_or_else(|| panic!("{} missing from load order", key.display_name()))
}

#[test]
fn test_diamond_dependency_load_order() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton_constructor(constructor!(LevelOne { new() }));
    sc.add_singleton_constructor(constructor!(LevelOneA { new() }));
    sc.add_singleton_constructor(constructor!(LevelTwo { new(LevelOne, LevelOneA) }));
    sc.add_singleton_constructor(constructor!(LevelThree { new(LevelTwo) }));
    sc.add_singleton_constructor(constructor!(LevelThreeA { new(LevelTwo) }));
    sc.add_singleton_constructor(constructor!(LevelFour { new(LevelThree, LevelThreeA) }));

    let sp = sc.build().unwrap();
    let order = sp.registry().load_order();

    assert_eq!(order.len(), 6);

    let one = position(&order, &key_of_type::<LevelOne>());
    let one_a = position(&order, &key_of_type::<LevelOneA>());
    let two = position(&order, &key_of_type::<LevelTwo>());
    let three = position(&order, &key_of_type::<LevelThree>());
    let three_a = position(&order, &key_of_type::<LevelThreeA>());
    let four = position(&order, &key_of_type::<LevelFour>());

    // Leaves occupy the first two slots, in either order
    assert!(one <= 1 && one_a <= 1);
    assert_eq!(two, 2);
    // Same-level services are unordered relative to each other
    assert!(three == 3 || three == 4);
    assert!(three_a == 3 || three_a == 4);
    assert_ne!(three, three_a);
    assert_eq!(four, 5);
}

#[test]
fn test_load_order_ignores_factory_and_instance_registrations() {
    struct FromFactory;
    struct Precomputed;

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Precomputed);
    sc.add_transient_factory::<FromFactory, _>(|_| FromFactory);
    sc.add_singleton_constructor(constructor!(LevelOne { new() }));

    let sp = sc.build().unwrap();
    let order = sp.registry().load_order();

    // Only the constructor-based registration participates; factory and
    // instance registrations (including the built-in provider services)
    // have opaque dependencies.
    assert_eq!(order.len(), 1);
    assert_eq!(order[0].key(), &key_of_type::<LevelOne>());
}

#[test]
fn test_dependencies_on_ineligible_services_do_not_affect_levels() {
    struct Opaque;

    struct Consumer;

    impl Consumer {
        fn new(_o: Arc<Opaque>, _one: Arc<LevelOne>) -> Self {
            Self
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton_factory::<Opaque, _>(|_| Opaque);
    sc.add_singleton_constructor(constructor!(LevelOne { new() }));
    sc.add_singleton_constructor(constructor!(Consumer { new(Opaque, LevelOne) }));

    let sp = sc.build().unwrap();
    let order = sp.registry().load_order();

    // Consumer still orders after LevelOne; the factory-built Opaque is
    // simply not part of the computation.
    assert_eq!(order.len(), 2);
    assert_eq!(order[0].key(), &key_of_type::<LevelOne>());
    assert_eq!(order[1].key(), &key_of_type::<Consumer>());
}

#[test]
fn test_empty_collection_has_empty_load_order() {
    let sp = ServiceCollection::new().build().unwrap();
    assert!(sp.registry().load_order().is_empty());
}

#[test]
fn test_load_order_is_stable_across_calls() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton_constructor(constructor!(LevelOne { new() }));
    sc.add_singleton_constructor(constructor!(LevelTwo { new(LevelOne, LevelOneA) }));
    sc.add_singleton_constructor(constructor!(LevelOneA { new() }));

    let sp = sc.build().unwrap();
    let first: Vec<&Key> = sp.registry().load_order().iter().map(|d| d.key()).collect();
    let second: Vec<&Key> = sp.registry().load_order().iter().map(|d| d.key()).collect();

    // Computed once and cached
    assert_eq!(first, second);
}

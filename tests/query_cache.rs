use swarm_ecs::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Health(u32);
impl Component for Health {}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Frozen;
impl Component for Frozen {
    const STORAGE: StorageType = StorageType::Tag;
}

fn world() -> World {
    let mut world = World::new();
    swarm_ecs::builtin::register_components(&mut world);
    world.register::<Health>();
    world.register::<Frozen>();
    world
}

#[test]
fn test_query_cache_basic() -> Result<()> {
    let mut world = world();

    for i in 0..100 {
        world.spawn((Position::new(i as f64, 0.0), Velocity::new(1.0, 1.0)))?;
    }

    let q = world.register_query::<(Position, Velocity)>()?;
    assert_eq!(world.query_len(q)?, 100);

    // Same kind set, in any order, shares the cached query
    let again = world.register_query::<(Velocity, Position)>()?;
    assert_eq!(q, again);

    let stats = world.query_cache_stats();
    assert_eq!(stats.num_cached_queries, 1);
    assert_eq!(stats.total_cached_entities, 100);
    Ok(())
}

#[test]
fn test_query_cache_incremental_updates() -> Result<()> {
    let mut world = world();
    let q = world.register_query::<(Position,)>()?;

    for i in 0..50 {
        world.spawn((Position::new(i as f64, 0.0),))?;
    }
    assert_eq!(world.query_len(q)?, 50);

    let doomed: Vec<_> = world.results(q)?.iter().copied().step_by(2).collect();
    for entity in doomed {
        world.remove(entity)?;
    }
    assert_eq!(world.query_len(q)?, 25);

    for i in 50..100 {
        world.spawn((Position::new(i as f64, 0.0),))?;
    }
    assert_eq!(world.query_len(q)?, 75);
    Ok(())
}

#[test]
fn test_tag_components_filter_queries() -> Result<()> {
    let mut world = world();
    let frozen = world.register_query::<(Health, Frozen)>()?;

    let a = world.spawn((Health(10), Frozen))?;
    let b = world.spawn((Health(20),))?;
    assert_eq!(world.results(frozen)?, &[a]);

    world.attach(b, Frozen)?;
    world.detach::<Frozen>(a)?;
    assert_eq!(world.results(frozen)?, &[b]);

    // Health survived the tag churn
    assert_eq!(world.get::<Health>(a)?, Some(&Health(10)));
    Ok(())
}

#[test]
fn test_replacing_a_component_keeps_membership() -> Result<()> {
    let mut world = world();
    let q = world.register_query::<(Health,)>()?;
    let a = world.spawn((Health(1),))?;
    let b = world.spawn((Health(2),))?;

    world.attach(a, Health(99))?;
    assert_eq!(world.results(q)?, &[a, b]);
    assert_eq!(world.get::<Health>(a)?, Some(&Health(99)));
    Ok(())
}

#[test]
fn test_unregistered_kind_fails_query_registration() {
    #[derive(Debug)]
    struct Unknown;
    impl Component for Unknown {}

    let mut world = world();
    assert!(matches!(
        world.register_query::<(Position, Unknown)>(),
        Err(EcsError::UnknownComponentKind(_))
    ));
}

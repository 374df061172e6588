use swarm_ecs::prelude::*;

#[test]
fn test_remove_twice_is_stale_not_a_crash() -> Result<()> {
    let mut world = World::new();
    swarm_ecs::builtin::register_components(&mut world);
    let render = world.register_query::<(Renderable, Shape, Position, Size)>()?;

    let entity = world.spawn((
        Renderable,
        Shape::new(Primitive::Box),
        Position::new(1.0, 2.0),
        Size::new(3.0),
    ))?;
    let survivor = world.spawn((
        Renderable,
        Shape::new(Primitive::Circle),
        Position::new(4.0, 5.0),
        Size::new(6.0),
    ))?;

    world.remove(entity)?;
    assert!(!world.is_alive(entity));
    assert_eq!(world.results(render)?, &[survivor]);

    assert_eq!(world.remove(entity), Err(EcsError::StaleEntity(entity)));
    assert_eq!(world.results(render)?, &[survivor]);
    assert_eq!(world.removed_entity_count(), 1);
    Ok(())
}

#[test]
fn test_stale_id_does_not_alias_reused_slot() -> Result<()> {
    let mut world = World::new();
    swarm_ecs::builtin::register_components(&mut world);

    let old = world.spawn((Position::new(1.0, 1.0),))?;
    world.remove(old)?;
    let new = world.spawn((Position::new(2.0, 2.0),))?;

    assert_ne!(old, new);
    assert!(matches!(world.get::<Position>(old), Err(EcsError::StaleEntity(_))));
    assert_eq!(world.get::<Position>(new)?, Some(&Position::new(2.0, 2.0)));
    Ok(())
}

#[test]
fn test_deferred_despawn_of_removed_entity_is_skipped() -> Result<()> {
    let mut world = World::new();
    swarm_ecs::builtin::register_components(&mut world);
    let entity = world.spawn((Position::new(0.0, 0.0),))?;

    let mut commands = CommandBuffer::new();
    commands.despawn(entity);
    commands.despawn(entity);
    commands.apply(&mut world)?;

    assert!(!world.is_alive(entity));
    assert_eq!(world.removed_entity_count(), 1);
    Ok(())
}

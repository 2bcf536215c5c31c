//! Host events flowing through a session into plugin hooks.

use orbscoop_host::prelude::*;
use orbscoop_system::prelude::*;

/// Moves every child of the pressed tool's orb slot into the user's space.
struct EjectOnPress;

impl Plugin for EjectOnPress {
    fn build(&self, _session: &mut Session) {}

    fn ready(&self, session: &mut Session) {
        let hooks = session
            .api::<HostHooksAPI>()
            .expect("EjectOnPress requires HostHooksAPI");

        hooks
            .register_observer::<OnSecondaryPress, _>("eject", |resources, event| {
                let HostEvent::SecondaryPress { tool } = event else {
                    return;
                };
                let Ok(mut world) = resources.get_mut::<World>() else {
                    return;
                };
                let Some(tool) = world.tool(*tool) else {
                    return;
                };
                for orb in world.children(tool.orb_slot) {
                    world.set_parent(orb, tool.user_space).unwrap();
                }
            })
            .expect("registration should succeed");
    }

    fn dependencies(&self) -> Vec<PluginId> {
        vec![PluginId::of::<WorldPlugin>()]
    }
}

fn seeded() -> (World, ToolId, SlotId, SlotId) {
    let mut world = World::new();
    let user = world.add_user(Side::Left).unwrap();
    let space = world.user_space(user).unwrap();
    let tool = world.add_tool(AssetKind::Material, space).unwrap();
    let orb_slot = world.tool(tool).unwrap().orb_slot;
    world
        .spawn_asset_container(orb_slot, AssetRef::material("Brick"))
        .unwrap();
    (world, tool, orb_slot, space)
}

#[test]
fn secondary_press_reaches_registered_hook() {
    let (world, tool, orb_slot, space) = seeded();

    let mut session = Session::new();
    session
        .add_plugins(WorldPlugin::with_world(world))
        .add_plugins(EjectOnPress);
    session.finish();

    emit(&session, HostEvent::SecondaryPress { tool });

    let world = session.get_resource::<World>().unwrap();
    assert!(world.children(orb_slot).is_empty());
    assert_eq!(world.children(space).len(), 1);
}

#[test]
fn creation_event_does_not_trigger_press_hooks() {
    let (world, _tool, orb_slot, _space) = seeded();

    let mut session = Session::new();
    session
        .add_plugins(WorldPlugin::with_world(world))
        .add_plugins(EjectOnPress);
    session.finish();

    let user = UserId::from_raw(0);
    emit(
        &session,
        HostEvent::AssetCreated {
            container: orb_slot,
            user,
        },
    );

    assert_eq!(
        session.get_resource::<World>().unwrap().children(orb_slot).len(),
        1
    );
}

#[test]
fn laser_handle_aims_the_published_prober() {
    let (mut world, tool, _orb_slot, _space) = seeded();
    let wall = world.spawn(world.root(), "Wall").unwrap();
    let brick = AssetRef::material("Wall Brick");
    world
        .set_renderer(
            wall,
            Renderer {
                material: Some(brick.clone()),
                mesh: None,
            },
        )
        .unwrap();

    let host = WorldPlugin::with_world(world);
    let laser = host.prober();
    let mut session = Session::new();
    session.add_plugins(host);
    session.finish();

    laser.aim(tool, Aim::Slot(wall));

    let prober = session
        .api::<HostCapabilities>()
        .and_then(|caps| caps.prober.clone())
        .unwrap();
    let world = session.get_resource::<World>().unwrap();
    let snapshot = world.tool(tool).unwrap();

    assert_eq!(
        prober.probe(&snapshot, &*world),
        Probe::Hit { asset: Some(brick) }
    );
}

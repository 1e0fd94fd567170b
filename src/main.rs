use avian3d::prelude::*;
use bevy::prelude::*;
use bevy_hazard_runner::prelude::*;

/// Model bounds of the demo character
const MODEL_MIN: Vec3 = Vec3::new(-0.3, 0.0, -0.25);
const MODEL_MAX: Vec3 = Vec3::new(0.3, 1.2, 0.25);

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hazard Runner".into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(HazardRunnerPlugin)
        .add_systems(Startup, (setup, spawn_level))
        .add_systems(Update, (walk_cycle_steps, touch_enemies, log_cues))
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let volume = CollisionVolume::from_bounds(MODEL_MIN, MODEL_MAX)?;
    let config = CharacterConfig {
        spawn_position: Vec3::new(0.1, 0.5, 0.0),
        ..default()
    };
    let character = spawn_character(&mut commands, config, volume);

    let size = MODEL_MAX - MODEL_MIN;
    commands.entity(character).insert(WalkCycle::default()).with_child((
        Mesh3d(meshes.add(Capsule3d::new(volume.radius(), size.y - 2.0 * volume.radius()))),
        MeshMaterial3d(materials.add(Color::srgb(0.9, 0.7, 0.3))),
        Transform::from_translation(volume.offset()),
    ));

    commands.spawn((
        Camera3d::default(),
        AimCamera,
        FollowCamera::default(),
        Transform::from_xyz(0.0, 3.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
    Ok(())
}

// ── Level ───────────────────────────────────────────────────────────

/// Walkable and blocking, like every piece of level geometry
fn level_layers() -> CollisionLayers {
    CollisionLayers::new([GameLayer::Ground, GameLayer::Solid], LayerMask::ALL)
}

fn spawn_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let floor_mat = materials.add(Color::srgb(0.35, 0.4, 0.35));
    let wall_mat = materials.add(Color::srgb(0.5, 0.5, 0.55));
    let lava_mat = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.25, 0.05),
        emissive: LinearRgba::rgb(4.0, 0.8, 0.1),
        ..default()
    });

    // Floor, with its top at y = 0
    spawn_block(
        &mut commands,
        &mut meshes,
        floor_mat.clone(),
        Vec3::new(20.0, 1.0, 20.0),
        Vec3::new(0.0, -0.5, 0.0),
    );

    // Raised platform to jump onto
    spawn_block(
        &mut commands,
        &mut meshes,
        floor_mat,
        Vec3::new(3.0, 0.3, 3.0),
        Vec3::new(-4.0, 0.15, -3.0),
    );

    // Lava strip, flush with the floor
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(4.0, 0.02, 2.0))),
        MeshMaterial3d(lava_mat),
        Transform::from_xyz(3.0, 0.0, -2.0),
        RigidBody::Static,
        Collider::cuboid(4.0, 0.02, 2.0),
        level_layers(),
        SurfaceKind::Hazard,
    ));

    // Boundary walls
    for (size, position) in [
        (Vec3::new(20.0, 2.0, 0.5), Vec3::new(0.0, 1.0, -10.0)),
        (Vec3::new(20.0, 2.0, 0.5), Vec3::new(0.0, 1.0, 10.0)),
        (Vec3::new(0.5, 2.0, 20.0), Vec3::new(-10.0, 1.0, 0.0)),
        (Vec3::new(0.5, 2.0, 12.0), Vec3::new(10.0, 1.0, -4.0)),
    ] {
        spawn_block(&mut commands, &mut meshes, wall_mat.clone(), size, position);
    }

    // Enemy standing near the gap in the east wall
    commands.spawn((
        Enemy,
        Mesh3d(meshes.add(Sphere::new(ENEMY_RADIUS))),
        MeshMaterial3d(materials.add(Color::srgb(0.6, 0.1, 0.7))),
        Transform::from_xyz(7.0, ENEMY_RADIUS, 6.0),
        RigidBody::Static,
        Collider::sphere(ENEMY_RADIUS),
        Sensor,
        CollisionLayers::new(GameLayer::Enemy, LayerMask::NONE),
    ));
}

fn spawn_block(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    material: Handle<StandardMaterial>,
    size: Vec3,
    position: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(size.x, size.y, size.z))),
        MeshMaterial3d(material),
        Transform::from_translation(position),
        RigidBody::Static,
        Collider::cuboid(size.x, size.y, size.z),
        level_layers(),
    ));
}

// ── Stand-ins for an animation player and enemy AI ──────────────────

#[derive(Component)]
struct Enemy;

const ENEMY_RADIUS: f32 = 0.4;

/// Seconds between footfalls at walk rate 1
const STRIDE: f32 = 0.35;

#[derive(Component, Default)]
struct WalkCycle(f32);

/// Plants a foot every stride while the character walks
fn walk_cycle_steps(
    mut query: Query<(Entity, &CharacterState, &mut WalkCycle)>,
    mut steps: MessageWriter<AnimationStep>,
    time: Res<Time>,
) {
    for (character, state, mut cycle) in &mut query {
        if !state.walking {
            cycle.0 = 0.0;
            continue;
        }
        cycle.0 += time.delta_secs() * state.walk_rate.max(0.1);
        if cycle.0 >= STRIDE {
            cycle.0 -= STRIDE;
            steps.write(AnimationStep { character });
        }
    }
}

/// Reports enemies overlapping the character capsule
fn touch_enemies(
    spatial_query: SpatialQuery,
    character_query: Query<
        (Entity, &CharacterState, &CollisionVolume, &CharacterShape),
        With<Character>,
    >,
    mut contacts: MessageWriter<EnemyContact>,
) {
    let filter = SpatialQueryFilter::default().with_mask(GameLayer::Enemy);

    for (character, state, volume, shape) in &character_query {
        let touching = spatial_query.shape_intersections(
            shape,
            volume.to_collision_space(state.position),
            Quat::IDENTITY,
            &filter,
        );
        if !touching.is_empty() {
            contacts.write(EnemyContact { character });
        }
    }
}

fn log_cues(mut cues: MessageReader<CharacterCue>) {
    for CharacterCue { character, cue } in cues.read() {
        debug!("{character}: {cue:?}");
    }
}

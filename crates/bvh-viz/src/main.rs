use bvh_tree::{BoundingSphere, BvhTree, DEGENERATE_EPSILON, QueryStats};
use bvh_viz::{
    DepthNavigator, OrbitCamera, draw_bounding_sphere, draw_contacts, draw_indexed_mesh,
    generate_cube, generate_uv_sphere, to_vec3,
};
use log::{error, info};
use macroquad::prelude::*;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

/// Where the moving sphere mesh sits at time `t`: circling the cube on a
/// tilted orbit while spinning about its own axis.
fn orbit(t: f32) -> Isometry3<f32> {
    let position = Vector3::new(1.1 * t.cos(), 0.4 * (0.7 * t).sin(), 1.1 * t.sin());
    Isometry3::new(position, Vector3::new(0.3 * t, t, 0.0))
}

/// Moves the probe sphere with WASD (horizontal) and Q/E (vertical).
fn move_probe(probe: &mut Point3<f32>, step: f32) {
    let keys = [
        (KeyCode::A, Vector3::new(-step, 0.0, 0.0)),
        (KeyCode::D, Vector3::new(step, 0.0, 0.0)),
        (KeyCode::W, Vector3::new(0.0, 0.0, -step)),
        (KeyCode::S, Vector3::new(0.0, 0.0, step)),
        (KeyCode::Q, Vector3::new(0.0, -step, 0.0)),
        (KeyCode::E, Vector3::new(0.0, step, 0.0)),
    ];
    for (key, delta) in keys {
        if is_key_down(key) {
            *probe += delta;
        }
    }
}

#[macroquad::main("BVH Collision")]
async fn main() {
    env_logger::init();

    let cube = generate_cube(Point3::origin(), 1.2);
    let ball = generate_uv_sphere(0.6, 10, 16);

    info!(
        "Building hierarchies: cube {} triangles, sphere {} triangles",
        cube.triangle_count(),
        ball.triangle_count()
    );
    let trees = (
        BvhTree::from_mesh(&cube.vertices, &cube.indices, DEGENERATE_EPSILON),
        BvhTree::from_mesh(&ball.vertices, &ball.indices, DEGENERATE_EPSILON),
    );
    let (cube_tree, ball_tree) = match trees {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) | (_, Err(e)) => {
            error!("Failed to build scene: {e}");
            return;
        }
    };
    info!(
        "Cube: {} nodes, depth {} | Sphere: {} nodes, depth {}",
        cube_tree.size(),
        cube_tree.depth(),
        ball_tree.size(),
        ball_tree.depth()
    );

    let deepest = if ball_tree.depth() >= cube_tree.depth() {
        &ball_tree
    } else {
        &cube_tree
    };

    let mut camera = OrbitCamera::new(5.0, 0.4, 0.4).with_zoom(0.5, 2.0, 20.0);
    let mut navigator = DepthNavigator::new();
    let mut probe = Point3::new(0.0, 1.2, 0.0);
    let mut paused = false;
    let mut time = 0.0f32;
    let cube_transform = Matrix4::identity();

    loop {
        camera.update();
        navigator.update(deepest);
        move_probe(&mut probe, 2.0 * get_frame_time());
        if is_key_pressed(KeyCode::Space) {
            paused = !paused;
        }
        if !paused {
            time += 0.5 * get_frame_time();
        }

        let ball_transform = orbit(time).to_homogeneous();
        let a = cube_tree.cursor(&cube.vertices, &cube_transform);
        let b = ball_tree.cursor(&ball.vertices, &ball_transform);

        let mut contacts = Vec::new();
        let mut stats = QueryStats::default();
        a.collide_all_with_stats(b, &mut contacts, &mut stats);
        let first = a.closest_collision(b);

        let probe_sphere = BoundingSphere::new(probe, 0.15);
        let probe_hits =
            a.collide_with_sphere(&probe_sphere) || b.collide_with_sphere(&probe_sphere);

        clear_background(Color::from_rgba(20, 20, 30, 255));
        set_camera(&camera.to_camera3d());

        draw_indexed_mesh(&cube, &cube_transform);
        draw_indexed_mesh(&ball, &ball_transform);

        navigator.render(&cube_tree, &cube_transform, Color::new(0.4, 0.8, 1.0, 0.6));
        navigator.render(&ball_tree, &ball_transform, Color::new(1.0, 0.6, 0.3, 0.6));

        draw_contacts(&contacts, 0.03, RED);
        if let Some(point) = first {
            draw_sphere_wires(to_vec3(&point), 0.08, None, YELLOW);
        }
        draw_bounding_sphere(
            &probe_sphere,
            &Matrix4::identity(),
            if probe_hits { MAGENTA } else { LIGHTGRAY },
        );

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 1.0), BLUE);

        set_default_camera();

        draw_text(
            &format!("BVH Collision - {} contacts", contacts.len()),
            10.0,
            25.0,
            20.0,
            WHITE,
        );
        draw_text(
            &format!(
                "Node pairs: {} | Triangle tests: {}",
                stats.node_pairs, stats.triangle_tests
            ),
            10.0,
            45.0,
            18.0,
            GRAY,
        );
        draw_text(
            &format!(
                "Probe: ({:.2}, {:.2}, {:.2}) {}",
                probe.x,
                probe.y,
                probe.z,
                if probe_hits { "touching" } else { "clear" }
            ),
            10.0,
            65.0,
            18.0,
            if probe_hits { MAGENTA } else { GRAY },
        );

        navigator.draw_ui(&[("Cube", &cube_tree), ("Sphere", &ball_tree)], 95.0);

        draw_text(
            "Drag mouse to rotate, scroll to zoom | WASD/QE probe | [Space] pause",
            10.0,
            180.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 200.0, 16.0, DARKGRAY);

        next_frame().await
    }
}

//! Level-by-level browsing of a hierarchy's bounding spheres.

use bvh_tree::{BoundingSphere, BvhTree};
use macroquad::prelude::*;
use nalgebra::Matrix4;

use crate::draw_bounding_sphere;

/// Shows the spheres found at one depth of a tree, stepped with the keyboard.
pub struct DepthNavigator {
    depth: usize,
    visible: bool,
}

impl Default for DepthNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl DepthNavigator {
    /// Starts at the root, with drawing switched on.
    pub fn new() -> Self {
        Self {
            depth: 0,
            visible: true,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Moves one level down, unless no node of `tree` lives that deep.
    pub fn go_deeper(&mut self, tree: &BvhTree) -> bool {
        if self.depth + 1 < tree.depth() {
            self.depth += 1;
            true
        } else {
            false
        }
    }

    pub fn go_shallower(&mut self) -> bool {
        if self.depth > 0 {
            self.depth -= 1;
            true
        } else {
            false
        }
    }

    /// Handles keyboard input. Returns true if the shown level changed.
    ///
    /// `tree` should be the deeper of the trees on screen, so every level of
    /// either stays reachable.
    pub fn update(&mut self, tree: &BvhTree) -> bool {
        let mut changed = false;

        if is_key_pressed(KeyCode::Up) {
            changed = self.go_shallower();
        }
        if is_key_pressed(KeyCode::Down) {
            changed = self.go_deeper(tree);
        }
        if is_key_pressed(KeyCode::V) {
            self.visible = !self.visible;
            changed = true;
        }

        changed
    }

    /// Spheres of `tree` at the current level, in the tree's local space.
    pub fn spheres(&self, tree: &BvhTree) -> Vec<BoundingSphere> {
        tree.collect_at_depth(self.depth)
    }

    /// Draws the current level of `tree` as placed by `transform`.
    pub fn render(&self, tree: &BvhTree, transform: &Matrix4<f32>, color: Color) {
        if !self.visible {
            return;
        }
        for sphere in self.spheres(tree) {
            draw_bounding_sphere(&sphere, transform, color);
        }
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui(&self, trees: &[(&str, &BvhTree)], y_offset: f32) {
        draw_text(
            &format!(
                "Sphere level: {}{}",
                self.depth,
                if self.visible { "" } else { " (hidden)" }
            ),
            10.0,
            y_offset,
            18.0,
            YELLOW,
        );
        for (row, (name, tree)) in trees.iter().enumerate() {
            draw_text(
                &format!(
                    "{}: {} spheres at this level, depth {}",
                    name,
                    self.spheres(tree).len(),
                    tree.depth()
                ),
                10.0,
                y_offset + 20.0 * (row + 1) as f32,
                18.0,
                WHITE,
            );
        }
        draw_text(
            "[Up]/[Down] level | [V] toggle spheres",
            10.0,
            y_offset + 20.0 * (trees.len() + 1) as f32,
            16.0,
            DARKGRAY,
        );
    }
}

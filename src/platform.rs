use crate::collision::CollisionCategory;
use crate::entity::Entity;
use crate::geometry::Vector2;
use crate::render::Renderer;

/// Static ledge riders stand on. Never awake, so it only ever gets hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    pub entity: Entity,
    debug_draw: bool,
}

impl Platform {
    pub fn new(top_left: Vector2, size: Vector2) -> Self {
        let center = top_left + size / 2.0;
        Platform {
            entity: Entity::new(center, size, CollisionCategory::Platform),
            debug_draw: false,
        }
    }

    /// Draw the collision box outline every frame.
    pub fn with_debug_draw(mut self, enabled: bool) -> Self {
        self.debug_draw = enabled;
        self
    }

    pub fn update(&mut self) -> bool {
        self.entity.object.default_update()
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        if self.debug_draw {
            renderer.draw_outline(self.entity.bounds());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DrawList;

    #[test]
    fn test_platform_built_from_top_left() {
        let platform = Platform::new(Vector2::new(100.0, 400.0), Vector2::new(200.0, 30.0));
        assert_eq!(platform.entity.object.position, Vector2::new(200.0, 415.0));
        assert_eq!(platform.entity.bounds().top_left, Vector2::new(100.0, 400.0));
        assert!(!platform.entity.awake);
        assert!(platform.entity.object.is_collidable());
    }

    #[test]
    fn test_outline_only_in_debug() {
        let mut list = DrawList::new();
        let platform = Platform::new(Vector2::new(100.0, 400.0), Vector2::new(200.0, 30.0));
        platform.draw(&mut list);
        assert!(list.outlines().is_empty());

        platform.with_debug_draw(true).draw(&mut list);
        assert_eq!(list.outlines().len(), 1);
        assert!(list.calls().is_empty());
    }
}

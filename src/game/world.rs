//! # World Module
//!
//! Tiles and the per-floor [`GameMap`] that owns them together with every
//! entity currently on the floor.

use crate::game::fov::compute_fov;
use crate::game::{Entity, EntityId, Position};
use crate::generation::RectangularRoom;
use crate::{UndercroftError, UndercroftResult};
use serde::{Deserialize, Serialize};

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
}

/// What to draw for a tile or entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Graphic {
    pub symbol: char,
    pub foreground: Color,
    pub background: Color,
}

impl Graphic {
    pub const fn new(symbol: char, foreground: Color, background: Color) -> Self {
        Self {
            symbol,
            foreground,
            background,
        }
    }
}

/// The kinds of terrain a tile can be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Wall,
    Floor,
    StairsDown,
}

impl TileType {
    /// Whether actors can stand on this terrain.
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileType::Wall)
    }

    /// Whether light passes through this terrain.
    pub fn is_transparent(self) -> bool {
        !matches!(self, TileType::Wall)
    }
}

/// A single map cell.
///
/// `visible` is recomputed every turn by the visibility engine. `seen` is
/// sticky: once a tile has been visible it stays remembered for the rest of
/// the floor, so `visible` always implies `seen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
    pub walkable: bool,
    pub transparent: bool,
    pub visible: bool,
    pub seen: bool,
    /// Graphic for remembered but not currently visible tiles
    pub dark: Graphic,
    /// Graphic for currently visible tiles
    pub light: Graphic,
}

impl Tile {
    /// Creates a fresh, unseen tile of the given type.
    pub fn new(tile_type: TileType) -> Self {
        let (dark, light) = match tile_type {
            TileType::Wall => (
                Graphic::new(' ', Color::WHITE, Color(0, 0, 100)),
                Graphic::new(' ', Color::WHITE, Color(130, 110, 50)),
            ),
            TileType::Floor => (
                Graphic::new(' ', Color::WHITE, Color(50, 50, 150)),
                Graphic::new(' ', Color::WHITE, Color(200, 180, 50)),
            ),
            TileType::StairsDown => (
                Graphic::new('>', Color(0, 0, 100), Color(50, 50, 150)),
                Graphic::new('>', Color::WHITE, Color(200, 180, 50)),
            ),
        };

        Self {
            tile_type,
            walkable: tile_type.is_walkable(),
            transparent: tile_type.is_transparent(),
            visible: false,
            seen: false,
            dark,
            light,
        }
    }

    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }

    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }

    pub fn down_stairs() -> Self {
        Self::new(TileType::StairsDown)
    }

    /// Sets visibility; a visible tile is also marked as seen.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.seen = true;
        }
    }

    /// The graphic a renderer should use, if any.
    pub fn graphic(&self) -> Option<Graphic> {
        if self.visible {
            Some(self.light)
        } else if self.seen {
            Some(self.dark)
        } else {
            None
        }
    }
}

/// One dungeon floor.
///
/// Owns the tile grid and every entity on the floor. Entities are looked up
/// and removed by [`EntityId`], never by position in the list, and the list
/// order is the order monsters take their turns in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    /// Dungeon depth of this floor
    pub depth: u32,
    /// Tile rows, indexed `[y][x]`
    pub tiles: Vec<Vec<Tile>>,
    /// Location of the single down staircase
    pub down_stairs: Option<Position>,
    /// Where the player enters this floor
    pub player_start: Position,
    entities: Vec<Entity>,
    next_serial: u32,
}

impl GameMap {
    /// Creates a floor of solid wall.
    ///
    /// # Examples
    ///
    /// ```
    /// use undercroft::{GameMap, Position, TileType};
    ///
    /// let map = GameMap::new(20, 10, 1);
    /// assert!(map.is_in_bounds(Position::new(19, 9)));
    /// assert!(!map.is_in_bounds(Position::new(20, 9)));
    /// assert_eq!(map.tile_at(Position::new(3, 3)).unwrap().tile_type, TileType::Wall);
    /// ```
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
            tiles: vec![vec![Tile::wall(); width as usize]; height as usize],
            down_stairs: None,
            player_start: Position::origin(),
            entities: Vec::new(),
            next_serial: 0,
        }
    }

    /// Checks whether a position lies on the map.
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    /// Gets the tile at a position, or None when out of bounds.
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        if !self.is_in_bounds(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    /// Gets the tile at a position mutably, or None when out of bounds.
    pub fn tile_at_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.is_in_bounds(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Replaces the tile at a position.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) -> UndercroftResult<()> {
        let slot = self.tile_at_mut(pos).ok_or_else(|| {
            UndercroftError::InvalidState(format!("Tile {} is out of bounds", pos))
        })?;
        *slot = tile;
        Ok(())
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile_at(pos).map(|tile| tile.walkable).unwrap_or(false)
    }

    pub fn is_transparent(&self, pos: Position) -> bool {
        self.tile_at(pos).map(|tile| tile.transparent).unwrap_or(false)
    }

    pub fn is_visible(&self, pos: Position) -> bool {
        self.tile_at(pos).map(|tile| tile.visible).unwrap_or(false)
    }

    pub fn is_seen(&self, pos: Position) -> bool {
        self.tile_at(pos).map(|tile| tile.seen).unwrap_or(false)
    }

    /// Iterates over every position of the map, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Copies a room's tile buffer into the map at the room's offset.
    ///
    /// Cells falling outside the map are skipped.
    pub fn stamp_room(&mut self, room: &RectangularRoom) {
        for (dy, row) in room.tiles().into_iter().enumerate() {
            for (dx, tile) in row.into_iter().enumerate() {
                let pos = Position::new(room.top_left.x + dx as i32, room.top_left.y + dy as i32);
                if let Some(slot) = self.tile_at_mut(pos) {
                    *slot = tile;
                }
            }
        }
    }

    /// Turns a tile into the floor's down staircase.
    pub fn place_down_stairs(&mut self, pos: Position) -> UndercroftResult<()> {
        if let Some(previous) = self.down_stairs.take() {
            self.set_tile(previous, Tile::floor())?;
        }
        self.set_tile(pos, Tile::down_stairs())?;
        self.down_stairs = Some(pos);
        Ok(())
    }

    /// Recomputes the visible set from `observer`.
    ///
    /// Clears `visible` everywhere (leaving `seen` alone), then marks every
    /// tile reached by shadowcasting within `radius` as visible and seen.
    pub fn update_visibility(&mut self, observer: Position, radius: i32) {
        for row in &mut self.tiles {
            for tile in row {
                tile.visible = false;
            }
        }

        let mut lit = Vec::new();
        compute_fov(
            observer,
            radius,
            |pos| self.is_transparent(pos),
            |pos| lit.push(pos),
        );

        for pos in lit {
            if let Some(tile) = self.tile_at_mut(pos) {
                tile.set_visible(true);
            }
        }
    }

    /// Positions currently visible, in row order.
    pub fn visible_positions(&self) -> Vec<Position> {
        self.positions().filter(|&pos| self.is_visible(pos)).collect()
    }

    /// Mints a new entity handle for this floor.
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.depth, self.next_serial);
        self.next_serial += 1;
        id
    }

    /// Appends an entity to the floor and returns its handle.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Removes an entity by handle.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.iter().any(|entity| entity.id == id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// All entities on the floor, in turn order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Handles of all entities on the floor, in turn order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|entity| entity.id).collect()
    }

    /// Living actors.
    pub fn actors(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|entity| entity.is_alive())
    }

    /// Items lying on the floor.
    pub fn items(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|entity| entity.is_item())
    }

    pub fn actors_at(&self, pos: Position) -> impl Iterator<Item = &Entity> {
        self.actors().filter(move |entity| entity.position == pos)
    }

    /// The living actor standing at a position, if any.
    pub fn actor_at(&self, pos: Position) -> Option<&Entity> {
        self.actors_at(pos).next()
    }

    pub fn items_at(&self, pos: Position) -> impl Iterator<Item = &Entity> {
        self.items().filter(move |entity| entity.position == pos)
    }

    /// The entity blocking movement into a position, if any.
    pub fn blocking_entity_at(&self, pos: Position) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.blocks_movement && entity.position == pos)
    }

    /// Whether any entity at all occupies a position.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.entities.iter().any(|entity| entity.position == pos)
    }
}

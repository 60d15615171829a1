use bevy::prelude::*;

/// Sprite drawn for the body stored at this index.
#[derive(Component, Deref, DerefMut)]
pub struct BodySprite(pub usize);

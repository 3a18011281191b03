use std::marker::PhantomData;

use bevy_asset::{Asset, AssetId, AssetIndex};
use bevy_ecs::system::Resource;
use bevy_reflect::Reflect;
use bevy_utils::HashMap;
use uuid::Uuid;

use crate::morph::MorphTargets;

/// Morph targets of every generated mesh asset, keyed by the asset they animate.
#[derive(Resource, Reflect)]
pub struct AssetsMorphTargets<A: Asset> {
    dense_storage: HashMap<u64, MorphTargets>,
    hash_map: HashMap<Uuid, MorphTargets>,
    #[reflect(ignore)]
    marker: PhantomData<fn() -> A>,
}

impl<A: Asset> Default for AssetsMorphTargets<A> {
    fn default() -> Self {
        Self {
            dense_storage: Default::default(),
            hash_map: Default::default(),
            marker: Default::default(),
        }
    }
}

impl<A: Asset> AssetsMorphTargets<A> {
    /// Retrieves the [`MorphTargets`] of the asset with the given `id`, if it exists.
    /// Note that this supports anything that implements `Into<AssetId<A>>`, which includes [`Handle`] and [`AssetId`].
    ///
    /// [`Handle`]: bevy_asset::Handle
    #[inline]
    pub fn get(&self, id: impl Into<AssetId<A>>) -> Option<&MorphTargets> {
        match id.into() {
            AssetId::Index { index, .. } => self.dense_storage.get(&index.to_bits()),
            AssetId::Uuid { uuid } => self.hash_map.get(&uuid),
        }
    }

    /// Removes (and returns) the [`MorphTargets`] of the asset with the given `id`, if it exists.
    pub fn remove(&mut self, id: impl Into<AssetId<A>>) -> Option<MorphTargets> {
        match id.into() {
            AssetId::Index { index, .. } => self.dense_storage.remove(&index.to_bits()),
            AssetId::Uuid { uuid } => self.hash_map.remove(&uuid),
        }
    }

    /// Inserts `targets` for the asset `id`, replacing any previous ones.
    pub fn insert(
        &mut self,
        id: impl Into<AssetId<A>>,
        targets: MorphTargets,
    ) -> Option<MorphTargets> {
        match id.into() {
            AssetId::Index { index, .. } => self.insert_with_index(index, targets),
            AssetId::Uuid { uuid } => self.hash_map.insert(uuid, targets),
        }
    }

    pub fn len(&self) -> usize {
        self.dense_storage.len() + self.hash_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_with_index(
        &mut self,
        index: AssetIndex,
        targets: MorphTargets,
    ) -> Option<MorphTargets> {
        self.dense_storage.insert(index.to_bits(), targets)
    }
}

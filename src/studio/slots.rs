use crate::{
    models::ImagePayload,
    studio::input::InputFile,
};
use serde::{Deserialize, Serialize};

pub const MAX_SLOT_IMAGES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Product,
    Background,
}

/// The three asset collections feeding every request. Collections never
/// exceed `MAX_SLOT_IMAGES`; extra incoming images are dropped silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetSlots {
    product: Vec<ImagePayload>,
    background: Vec<ImagePayload>,
    reference: Option<ImagePayload>,
}

impl AssetSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remaining(&self, slot: Slot) -> usize {
        MAX_SLOT_IMAGES.saturating_sub(self.images(slot).len())
    }

    /// Decodes and appends up to `remaining(slot)` files. Returns how many were kept.
    pub fn add(&mut self, files: impl IntoIterator<Item = InputFile>, slot: Slot) -> usize {
        self.add_payloads(files.into_iter().map(InputFile::into_payload), slot)
    }

    pub fn add_payloads(
        &mut self,
        images: impl IntoIterator<Item = ImagePayload>,
        slot: Slot,
    ) -> usize {
        let remaining = self.remaining(slot);
        let target = self.images_mut(slot);
        let before = target.len();
        target.extend(images.into_iter().take(remaining));
        let added = target.len() - before;

        log::debug!("Added {} image(s) to {:?} slot ({} total)", added, slot, target.len());
        added
    }

    /// Removes one entry, keeping the order of the rest. Out-of-range is a no-op.
    pub fn remove(&mut self, index: usize, slot: Slot) -> Option<ImagePayload> {
        let target = self.images_mut(slot);
        if index < target.len() {
            Some(target.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self, slot: Slot) {
        self.images_mut(slot).clear();
    }

    pub fn set_reference(&mut self, image: Option<ImagePayload>) {
        self.reference = image;
    }

    /// Replaces every slot at once, clamped to capacity.
    pub fn restore(
        &mut self,
        product: &[ImagePayload],
        background: &[ImagePayload],
        reference: Option<&ImagePayload>,
    ) {
        self.product = product.iter().take(MAX_SLOT_IMAGES).cloned().collect();
        self.background = background.iter().take(MAX_SLOT_IMAGES).cloned().collect();
        self.reference = reference.cloned();
    }

    pub fn images(&self, slot: Slot) -> &[ImagePayload] {
        match slot {
            Slot::Product => &self.product,
            Slot::Background => &self.background,
        }
    }

    pub fn product(&self) -> &[ImagePayload] {
        &self.product
    }

    pub fn background(&self) -> &[ImagePayload] {
        &self.background
    }

    pub fn reference(&self) -> Option<&ImagePayload> {
        self.reference.as_ref()
    }

    fn images_mut(&mut self, slot: Slot) -> &mut Vec<ImagePayload> {
        match slot {
            Slot::Product => &mut self.product,
            Slot::Background => &mut self.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize) -> Vec<InputFile> {
        (0..n)
            .map(|i| InputFile::new(format!("{}.png", i), "image/png", vec![i as u8]))
            .collect()
    }

    #[test]
    fn test_add_truncates_to_remaining() {
        let mut slots = AssetSlots::new();
        assert_eq!(slots.add(files(3), Slot::Product), 3);
        assert_eq!(slots.remaining(Slot::Product), 2);

        assert_eq!(slots.add(files(4), Slot::Product), 2);
        assert_eq!(slots.product().len(), MAX_SLOT_IMAGES);

        assert_eq!(slots.add(files(1), Slot::Product), 0);
        assert_eq!(slots.product().len(), MAX_SLOT_IMAGES);
        assert!(slots.background().is_empty());
    }

    #[test]
    fn test_add_keeps_first_incoming_images() {
        let mut slots = AssetSlots::new();
        slots.add(files(4), Slot::Background);
        slots.add(files(3), Slot::Background);

        let expected = InputFile::new("0.png", "image/png", vec![0]).into_payload();
        assert_eq!(slots.background()[4], expected);
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut slots = AssetSlots::new();
        slots.add(files(3), Slot::Product);
        let original = slots.product().to_vec();

        let removed = slots.remove(1, Slot::Product);
        assert_eq!(removed.as_ref(), Some(&original[1]));
        assert_eq!(slots.product(), &[original[0].clone(), original[2].clone()]);

        assert!(slots.remove(7, Slot::Product).is_none());
        assert_eq!(slots.product().len(), 2);
    }

    #[test]
    fn test_reference_is_replaced_atomically() {
        let mut slots = AssetSlots::new();
        let first = ImagePayload::new("image/png", "AA");
        let second = ImagePayload::new("image/png", "BB");

        slots.set_reference(Some(first));
        slots.set_reference(Some(second.clone()));
        assert_eq!(slots.reference(), Some(&second));

        slots.set_reference(None);
        assert!(slots.reference().is_none());
    }

    #[test]
    fn test_restore_clamps_to_capacity() {
        let mut slots = AssetSlots::new();
        let many: Vec<_> = files(7).into_iter().map(InputFile::into_payload).collect();
        slots.restore(&many, &many[..1], None);
        assert_eq!(slots.product().len(), MAX_SLOT_IMAGES);
        assert_eq!(slots.background().len(), 1);
    }
}

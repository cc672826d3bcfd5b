use crate::config::StringArrayEncoding;
use crate::util::crypt;
use crate::util::random::{RandomGenerator, ALPHANUMERIC};
use indexmap::IndexMap;

const DECODE_KEY_LENGTH: usize = 4;
const MIN_ROTATION: i64 = 100;
const MAX_ROTATION: i64 = 500;

/// One string-array entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringArrayStorageItem {
    pub value: String,
    /// Logical index used by call sites. Reassigned by [`StringArrayStorage::shuffle`].
    pub index: usize,
    pub encoding: StringArrayEncoding,
    /// RC4 key; `None` for the other encodings.
    pub decode_key: Option<String>,
    /// Value as it appears in the printed array.
    pub encoded_value: String,
}

/// Program-wide array of extracted string literals.
///
/// Items are unique per (value, encoding). The physical order is what the
/// printer emits; call sites address items through their logical `index`
/// plus [`index_shift_amount`](Self::index_shift_amount).
#[derive(Debug, Clone)]
pub struct StringArrayStorage {
    storage_name: String,
    root_wrapper_names: IndexMap<StringArrayEncoding, String>,
    items: IndexMap<(String, StringArrayEncoding), StringArrayStorageItem>,
    index_shift_amount: i64,
    rotation_amount: usize,
}

impl StringArrayStorage {
    pub fn new(
        storage_name: impl Into<String>,
        root_wrapper_names: IndexMap<StringArrayEncoding, String>,
        index_shift_amount: i64,
    ) -> Self {
        Self {
            storage_name: storage_name.into(),
            root_wrapper_names,
            items: IndexMap::new(),
            index_shift_amount,
            rotation_amount: 0,
        }
    }

    /// Name of the array binding itself.
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    /// Name of the program-level decoding accessor for `encoding`.
    pub fn root_wrapper_name(&self, encoding: StringArrayEncoding) -> Option<&str> {
        self.root_wrapper_names.get(&encoding).map(String::as_str)
    }

    pub fn root_wrapper_names(&self) -> impl Iterator<Item = (StringArrayEncoding, &str)> {
        self.root_wrapper_names
            .iter()
            .map(|(encoding, name)| (*encoding, name.as_str()))
    }

    pub fn index_shift_amount(&self) -> i64 {
        self.index_shift_amount
    }

    /// Rotation applied to the physical order; the runtime decoder rotates back.
    pub fn rotation_amount(&self) -> usize {
        self.rotation_amount
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, value: &str, encoding: StringArrayEncoding) -> Option<&StringArrayStorageItem> {
        self.items.get(&(value.to_string(), encoding))
    }

    /// Item for (value, encoding), created with the next free index if absent.
    pub fn get_or_insert(
        &mut self,
        value: &str,
        encoding: StringArrayEncoding,
        random: &mut RandomGenerator,
    ) -> &StringArrayStorageItem {
        let index = self.items.len();
        self.items
            .entry((value.to_string(), encoding))
            .or_insert_with(|| {
                let decode_key = (encoding == StringArrayEncoding::Rc4)
                    .then(|| random.get_random_string(DECODE_KEY_LENGTH, ALPHANUMERIC));
                StringArrayStorageItem {
                    value: value.to_string(),
                    index,
                    encoding,
                    encoded_value: crypt::encode(value, encoding, decode_key.as_deref()),
                    decode_key,
                }
            })
    }

    /// Items in printed order.
    pub fn items(&self) -> impl Iterator<Item = &StringArrayStorageItem> {
        self.items.values()
    }

    /// Randomly reorder the array and renumber every item to its new position.
    pub fn shuffle(&mut self, random: &mut RandomGenerator) {
        let mut entries: Vec<_> = self.items.drain(..).collect();
        random.shuffle(&mut entries);
        self.items = entries
            .into_iter()
            .enumerate()
            .map(|(index, (key, mut item))| {
                item.index = index;
                (key, item)
            })
            .collect();
    }

    /// Rotate the printed order left by a random amount in [100, 500]. Item
    /// indices are left untouched.
    pub fn rotate(&mut self, random: &mut RandomGenerator) {
        let amount = random.get_random_integer(MIN_ROTATION, MAX_ROTATION) as usize;
        self.rotation_amount = amount;
        if self.items.is_empty() {
            return;
        }

        let mut entries: Vec<_> = self.items.drain(..).collect();
        let len = entries.len();
        entries.rotate_left(amount % len);
        self.items = entries.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> StringArrayStorage {
        let mut roots = IndexMap::new();
        roots.insert(StringArrayEncoding::None, "_0xroot".to_string());
        StringArrayStorage::new("_0xarr", roots, 0)
    }

    #[test]
    fn test_items_are_unique_per_value_and_encoding() {
        let mut random = RandomGenerator::new(Some(1));
        let mut storage = storage();

        let first = storage
            .get_or_insert("foo", StringArrayEncoding::None, &mut random)
            .index;
        let again = storage
            .get_or_insert("foo", StringArrayEncoding::None, &mut random)
            .index;
        let encoded = storage
            .get_or_insert("foo", StringArrayEncoding::Base64, &mut random)
            .index;

        assert_eq!(first, again);
        assert_ne!(first, encoded);
        assert_eq!(storage.len(), 2);
    }

    #[test]
    fn test_rc4_items_get_decode_key() {
        let mut random = RandomGenerator::new(Some(2));
        let mut storage = storage();
        let item = storage
            .get_or_insert("secret", StringArrayEncoding::Rc4, &mut random)
            .clone();

        let key = item.decode_key.expect("rc4 items carry a key");
        assert_eq!(key.len(), DECODE_KEY_LENGTH);
        assert_eq!(
            item.encoded_value,
            crypt::encode("secret", StringArrayEncoding::Rc4, Some(&key))
        );
    }

    #[test]
    fn test_shuffle_renumbers_in_printed_order() {
        let mut random = RandomGenerator::new(Some(3));
        let mut storage = storage();
        for value in ["aaa", "bbb", "ccc", "ddd", "eee", "fff"] {
            storage.get_or_insert(value, StringArrayEncoding::None, &mut random);
        }
        storage.shuffle(&mut random);

        for (position, item) in storage.items().enumerate() {
            assert_eq!(item.index, position);
        }
        assert_eq!(storage.len(), 6);
    }

    #[test]
    fn test_rotate_keeps_indices_and_records_amount() {
        let mut random = RandomGenerator::new(Some(4));
        let mut storage = storage();
        for value in ["aaa", "bbb", "ccc"] {
            storage.get_or_insert(value, StringArrayEncoding::None, &mut random);
        }
        storage.rotate(&mut random);

        let amount = storage.rotation_amount();
        assert!((100..=500).contains(&amount));
        let printed: Vec<usize> = storage.items().map(|item| item.index).collect();
        let mut expected = vec![0, 1, 2];
        expected.rotate_left(amount % 3);
        assert_eq!(printed, expected);
        assert_eq!(storage.get("bbb", StringArrayEncoding::None).unwrap().index, 1);
    }
}

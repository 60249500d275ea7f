use crate::octree::{OccupancyStore, OccupancyWord, StoreConfig, StoreError, V3c};
use bendy::{
    decoding::{FromBencode, ListDecoder, Object},
    encoding::{Error as BencodeError, SingleItemEncoder, ToBencode},
};
use std::path::Path;

const STORE_IDENTIFIER: &str = "svo#";

//####################################################################################
// OccupancyStore
//####################################################################################
/// Layout: ["svo#", root center x, y, z, root size, max depth, leaf size, bits per word, words]
/// Floats are stored by their bits, words as little endian bytes
impl<W: OccupancyWord> ToBencode for OccupancyStore<W> {
    const MAX_DEPTH: usize = 2;
    fn encode(&self, encoder: SingleItemEncoder) -> Result<(), BencodeError> {
        let little_endian_words: Vec<W> = self.words.iter().map(|word| word.to_le()).collect();
        encoder.emit_list(|e| {
            e.emit_str(STORE_IDENTIFIER)?;
            e.emit_int(self.config.root_center.x.to_bits())?;
            e.emit_int(self.config.root_center.y.to_bits())?;
            e.emit_int(self.config.root_center.z.to_bits())?;
            e.emit_int(self.config.root_size.to_bits())?;
            e.emit_int(self.config.max_depth)?;
            e.emit_int(self.config.min_leaf_size.to_bits())?;
            e.emit_int(self.config.bits_per_word)?;
            e.emit_bytes(bytemuck::cast_slice(&little_endian_words))?;
            Ok(())
        })
    }
}

/// The decoded fields of an encoded store, not yet validated
struct EncodedStore {
    config: StoreConfig,
    word_bytes: Vec<u8>,
}

fn decode_u32(list: &mut ListDecoder, field: &str) -> Result<u32, bendy::decoding::Error> {
    match list.next_object()? {
        Some(Object::Integer(i)) => i.parse::<u32>().map_err(|_| {
            bendy::decoding::Error::unexpected_token(field, format!("the number: {}", i))
        }),
        _ => Err(bendy::decoding::Error::unexpected_token(
            field,
            "Something else",
        )),
    }
}

impl FromBencode for EncodedStore {
    fn decode_bencode_object(data: Object) -> Result<Self, bendy::decoding::Error> {
        match data {
            Object::List(mut list) => {
                match list.next_object()? {
                    Some(Object::Bytes(b)) if b == STORE_IDENTIFIER.as_bytes() => Ok(()),
                    _ => Err(bendy::decoding::Error::unexpected_token(
                        "Occupancy store identifier string",
                        "Something else",
                    )),
                }?;

                let root_center = V3c::new(
                    f32::from_bits(decode_u32(&mut list, "int field root center x")?),
                    f32::from_bits(decode_u32(&mut list, "int field root center y")?),
                    f32::from_bits(decode_u32(&mut list, "int field root center z")?),
                );
                let root_size = f32::from_bits(decode_u32(&mut list, "int field root size")?);
                let max_depth = decode_u32(&mut list, "int field max depth")?;
                let min_leaf_size = f32::from_bits(decode_u32(&mut list, "int field leaf size")?);
                let bits_per_word = decode_u32(&mut list, "int field bits per word")?;

                let word_bytes = match list.next_object()? {
                    Some(Object::Bytes(b)) => Ok(b.to_vec()),
                    _ => Err(bendy::decoding::Error::unexpected_token(
                        "byte string field words",
                        "Something else",
                    )),
                }?;

                Ok(Self {
                    config: StoreConfig {
                        root_center,
                        root_size,
                        max_depth,
                        min_leaf_size,
                        bits_per_word,
                    },
                    word_bytes,
                })
            }
            _ => Err(bendy::decoding::Error::unexpected_token("List", "not List")),
        }
    }
}

impl<W: OccupancyWord> FromBencode for OccupancyStore<W> {
    fn decode_bencode_object(data: Object) -> Result<Self, bendy::decoding::Error> {
        let encoded = EncodedStore::decode_bencode_object(data)?;
        Self::from_encoded(encoded)
            .map_err(|err| {
                bendy::decoding::Error::unexpected_token("A valid occupancy store", err.to_string())
            })
    }
}

impl<W: OccupancyWord> OccupancyStore<W> {
    fn from_encoded(encoded: EncodedStore) -> Result<Self, StoreError> {
        let mut store = Self::from_bytes(encoded.config, &encoded.word_bytes)?;
        for word in store.words.iter_mut() {
            *word = W::from_le(*word);
        }
        Ok(store)
    }

    /// converts the data structure to a byte representation
    pub fn to_bytecode(&self) -> Result<Vec<u8>, StoreError> {
        self.to_bencode()
            .map_err(|err| StoreError::Bytecode(err.to_string()))
    }

    /// parses the data structure from a byte string, validating the layout stored inside
    pub fn from_bytecode(bytes: &[u8]) -> Result<Self, StoreError> {
        let encoded = EncodedStore::from_bencode(bytes)
            .map_err(|err| StoreError::Bytecode(err.to_string()))?;
        Self::from_encoded(encoded)
    }

    /// saves the data structure to the given file path
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        std::fs::write(path, self.to_bytecode()?)?;
        Ok(())
    }

    /// loads the data structure from the given file path
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_bytecode(&std::fs::read(path)?)
    }
}

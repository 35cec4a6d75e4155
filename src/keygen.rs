use crate::error::{BoxDynError, Error};
use crate::Flake;

/// byte length of the key prefix
pub const KEY_PREFIX_LEN: usize = 3;
/// byte length of the pod identifier
pub const POD_IDENTIFIER_LEN: usize = 3;
/// byte length of the encoded numeric identifier
pub const ENCODED_ID_LEN: usize = 10;
/// byte length of the assembled key before the checksum expansion
pub const RAW_KEY_LEN: usize = 15;
/// byte length of the external key
pub const SEALED_KEY_LEN: usize = 18;

/// Turns a raw 64-bit identifier into the external key format.
///
/// The alphabet, padding and checksum scheme are deployment-specific; the
/// generator only guarantees the encoder receives a valid identifier and a
/// length-validated prefix/pod pair.
pub trait KeyEncoder {
    /// Encode a raw 64-bit identifier as the 10-byte body of the key.
    fn encode(&self, id: u64) -> Result<[u8; ENCODED_ID_LEN], BoxDynError>;

    /// Expand the assembled 15-byte key with checksum/padding bytes into
    /// its 18-byte external form.
    fn checksum(&self, key: &[u8; RAW_KEY_LEN]) -> [u8; SEALED_KEY_LEN];
}

/// KeyGenerator wraps a [`Flake`] and formats its identifiers into external
/// keys through a pluggable [`KeyEncoder`].
///
/// [`Flake`]: struct.Flake.html
/// [`KeyEncoder`]: trait.KeyEncoder.html
pub struct KeyGenerator<E> {
    flake: Flake,
    encoder: E,
}

impl<E: KeyEncoder> KeyGenerator<E> {
    /// Create a new KeyGenerator backed by a default-configured [`Flake`].
    ///
    /// [`Flake`]: struct.Flake.html
    pub fn new(encoder: E) -> Result<Self, Error> {
        Ok(Self {
            flake: Flake::new()?,
            encoder,
        })
    }

    /// Create a new KeyGenerator backed by the given [`Flake`].
    ///
    /// [`Flake`]: struct.Flake.html
    pub fn with_flake(flake: Flake, encoder: E) -> Self {
        Self { flake, encoder }
    }

    /// Mint the next identifier and format it as an external key.
    ///
    /// `key_prefix` and `pod_identifier` must each be exactly 3 bytes; only
    /// the first two bytes of the pod identifier land in the key.
    pub fn next_key(&self, key_prefix: &[u8], pod_identifier: &[u8]) -> Result<String, Error> {
        if key_prefix.len() != KEY_PREFIX_LEN {
            return Err(Error::InvalidKeyPrefixLength(key_prefix.len()));
        }
        if pod_identifier.len() != POD_IDENTIFIER_LEN {
            return Err(Error::InvalidPodIdentifierLength(pod_identifier.len()));
        }

        let id = self.flake.next_id()?;
        let body = self.encoder.encode(id).map_err(Error::EncodeFailed)?;

        let mut key = [0u8; RAW_KEY_LEN];
        key[..3].copy_from_slice(key_prefix);
        key[3..5].copy_from_slice(&pod_identifier[..2]);
        key[5..].copy_from_slice(&body);

        let sealed = self.encoder.checksum(&key);
        String::from_utf8(sealed.to_vec()).map_err(|e| Error::EncodeFailed(e.into()))
    }
}

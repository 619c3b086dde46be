/// Fixed-width byte newtype. Text form is `0x`-prefixed lowercase hex, SSZ form is the raw
/// bytes and the tree hash is that of `Vector[byte, N]`.
#[macro_export]
macro_rules! fixed_bytes_wrapper {
    (
        $(#[$attr:meta])*
        $vis:vis struct $Name:ident;
        size = $N:expr;
    ) => {
        $(#[$attr])*
        #[derive(
            Debug,
            Default,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        $vis struct $Name(pub ::alloy_primitives::FixedBytes<$N>);

        impl $Name {
            pub const SIZE: usize = $N;

            /// Rejects anything that is not exactly `SIZE` bytes long.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, $crate::CodecError> {
                if bytes.len() != $N {
                    return Err($crate::CodecError::LengthMismatch {
                        expected: $N,
                        got: bytes.len(),
                    });
                }
                Ok(Self(::alloy_primitives::FixedBytes::from_slice(bytes)))
            }

            pub fn to_hex_text(&self) -> String {
                ::alloy_primitives::hex::encode_prefixed(self.0)
            }

            pub fn from_hex_text(text: &str) -> Result<Self, $crate::CodecError> {
                let stripped = text.strip_prefix("0x").ok_or_else(|| {
                    $crate::CodecError::Hex(format!("missing 0x prefix: {text}"))
                })?;
                let bytes = ::alloy_primitives::hex::decode(stripped)?;
                Self::from_bytes(&bytes)
            }

            pub fn as_slice(&self) -> &[u8] {
                self.0.as_slice()
            }

            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }
        }

        impl ::core::ops::Deref for $Name {
            type Target = ::alloy_primitives::FixedBytes<$N>;
            #[inline] fn deref(&self) -> &Self::Target { &self.0 }
        }

        impl AsRef<[u8]> for $Name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_slice()
            }
        }

        impl From<[u8; $N]> for $Name {
            fn from(bytes: [u8; $N]) -> Self {
                Self(::alloy_primitives::FixedBytes(bytes))
            }
        }

        impl From<::alloy_primitives::FixedBytes<$N>> for $Name {
            fn from(bytes: ::alloy_primitives::FixedBytes<$N>) -> Self {
                Self(bytes)
            }
        }

        impl ::core::fmt::Display for $Name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.to_hex_text())
            }
        }

        impl ::core::str::FromStr for $Name {
            type Err = $crate::CodecError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex_text(s)
            }
        }

        impl ::ssz::Encode for $Name {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $N
            }

            fn ssz_bytes_len(&self) -> usize {
                $N
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(self.0.as_slice());
            }
        }

        impl ::ssz::Decode for $Name {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $N
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ::ssz::DecodeError> {
                if bytes.len() != $N {
                    return Err(::ssz::DecodeError::InvalidByteLength {
                        len: bytes.len(),
                        expected: $N,
                    });
                }
                Ok(Self(::alloy_primitives::FixedBytes::from_slice(bytes)))
            }
        }

        impl ::tree_hash::TreeHash for $Name {
            fn tree_hash_type() -> ::tree_hash::TreeHashType {
                ::tree_hash::TreeHashType::Vector
            }

            fn tree_hash_packed_encoding(&self) -> ::tree_hash::PackedEncoding {
                unreachable!("Vector should never be packed.")
            }

            fn tree_hash_packing_factor() -> usize {
                unreachable!("Vector should never be packed.")
            }

            fn tree_hash_root(&self) -> ::tree_hash::Hash256 {
                ::tree_hash::merkle_root(self.0.as_slice(), 0)
            }
        }
    };
}

/// Variable-length byte list bounded by `max`, backed by `alloy_primitives::Bytes`.
#[macro_export]
macro_rules! ssz_bytes_wrapper {
    (
        $(#[$attr:meta])*
        $vis:vis struct $Name:ident;
        max  = $Max:ty;
    ) => {
        $(#[$attr])*
        #[derive(Debug, Default, PartialEq, Eq, Hash, Clone, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $Name(pub ::alloy_primitives::Bytes);

        impl $Name {
            pub fn max_len() -> usize {
                <$Max as ::ssz_types::typenum::Unsigned>::to_usize()
            }

            pub fn new(bytes: impl Into<::alloy_primitives::Bytes>) -> Result<Self, $crate::CodecError> {
                let bytes = bytes.into();
                if bytes.len() > Self::max_len() {
                    return Err($crate::CodecError::LengthMismatch {
                        expected: Self::max_len(),
                        got: bytes.len(),
                    });
                }
                Ok(Self(bytes))
            }
        }

        impl ::core::ops::Deref for $Name {
            type Target = ::alloy_primitives::Bytes;
            #[inline] fn deref(&self) -> &Self::Target { &self.0 }
        }

        impl ::ssz::Encode for $Name {
            fn is_ssz_fixed_len() -> bool {
                false
            }

            fn ssz_bytes_len(&self) -> usize {
                self.0.len()
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                buf.extend_from_slice(self.0.as_ref());
            }
        }

        impl ::ssz::Decode for $Name {
            fn is_ssz_fixed_len() -> bool {
                false
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ::ssz::DecodeError> {
                if bytes.len() > Self::max_len() {
                    return Err(::ssz::DecodeError::BytesInvalid(format!(
                        "{} exceeds max length: {} > {}",
                        stringify!($Name),
                        bytes.len(),
                        Self::max_len()
                    )));
                }
                Ok(Self(::alloy_primitives::Bytes::copy_from_slice(bytes)))
            }
        }

        impl ::tree_hash::TreeHash for $Name {
            #[inline]
            fn tree_hash_type() -> ::tree_hash::TreeHashType {
                ::tree_hash::TreeHashType::List
            }

            #[inline]
            fn tree_hash_packed_encoding(&self) -> ::tree_hash::PackedEncoding {
                unreachable!("List should never be packed.")
            }

            #[inline]
            fn tree_hash_packing_factor() -> usize {
                unreachable!("List should never be packed.")
            }

            #[inline]
            fn tree_hash_root(&self) -> ::tree_hash::Hash256 {
                let root = ::tree_hash::merkle_root(
                    self.0.as_ref(),
                    Self::max_len().div_ceil(::tree_hash::HASHSIZE),
                );
                ::tree_hash::mix_in_length(&root, self.0.len())
            }
        }

        impl ::core::fmt::Display for $Name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Leaf for a raw byte string: up to one chunk is right-padded, longer inputs are merkleized
/// over their chunks without a length mixin.
pub fn bytes_leaf(bytes: &[u8]) -> tree_hash::Hash256 {
    tree_hash::merkle_root(bytes, 0)
}

/// Merkleizes already-computed 32 byte leaves, padding to the next power of two.
pub fn merkleize_leaves(leaves: &[tree_hash::Hash256]) -> tree_hash::Hash256 {
    let mut bytes = Vec::with_capacity(leaves.len() * tree_hash::HASHSIZE);
    for leaf in leaves {
        bytes.extend_from_slice(leaf.as_slice());
    }
    tree_hash::merkle_root(&bytes, leaves.len())
}

pub fn u64_leaf(value: u64) -> tree_hash::Hash256 {
    tree_hash::merkle_root(&value.to_le_bytes(), 0)
}

use core::{fmt, str::FromStr};

use crate::{Component, Error, Result, TWITTER_EPOCH_MILLIS};

/// A 64-bit Snowflake ID using the Twitter layout
///
/// - 1 bit reserved
/// - 41 bits timestamp (ms since [`TWITTER_EPOCH`])
/// - 5 bits datacenter ID
/// - 5 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63         63 62          22 21            17 16        12 11           0
///              +------------+--------------+----------------+------------+--------------+
///  Field:      | reserved(1)| timestamp(41)| datacenter(5)  | worker(5)  | sequence(12) |
///              +------------+--------------+----------------+------------+--------------+
///              |<---------- MSB ------------- 64 bits ------------- LSB --------------->|
/// ```
///
/// IDs order by their raw value, so IDs from one generator sort by creation
/// time.
///
/// # Example
///
/// ```
/// use flakeid::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 2, 3, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.datacenter_id(), 2);
/// assert_eq!(id.worker_id(), 3);
/// assert_eq!(id.sequence(), 1);
/// ```
///
/// [`TWITTER_EPOCH`]: crate::TWITTER_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u64 = 41;

    /// Width of the datacenter ID field.
    pub const DATACENTER_ID_BITS: u64 = 5;

    /// Width of the worker ID field.
    pub const WORKER_ID_BITS: u64 = 5;

    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u64 = 12;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 5-bit datacenter ID field. Occupies bits 17
    /// through 21.
    pub const DATACENTER_ID_MASK: u64 = (1 << Self::DATACENTER_ID_BITS) - 1;

    /// Bitmask for extracting the 5-bit worker ID field. Occupies bits 12
    /// through 16.
    pub const WORKER_ID_MASK: u64 = (1 << Self::WORKER_ID_BITS) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the worker ID to its position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = Self::SEQUENCE_BITS;

    /// Number of bits to shift the datacenter ID to its position (bit 17).
    pub const DATACENTER_ID_SHIFT: u64 = Self::SEQUENCE_BITS + Self::WORKER_ID_BITS;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 =
        Self::SEQUENCE_BITS + Self::WORKER_ID_BITS + Self::DATACENTER_ID_BITS;

    /// Largest datacenter ID that fits the layout.
    pub const MAX_DATACENTER_ID: u64 = Self::DATACENTER_ID_MASK;

    /// Largest worker ID that fits the layout.
    pub const MAX_WORKER_ID: u64 = Self::WORKER_ID_MASK;

    /// Largest sequence number within one millisecond.
    pub const MAX_SEQUENCE: u64 = Self::SEQUENCE_MASK;

    /// Builds an ID from its components, masking each one to its field width.
    ///
    /// `timestamp` is in milliseconds since [`TWITTER_EPOCH`].
    ///
    /// [`TWITTER_EPOCH`]: crate::TWITTER_EPOCH
    pub const fn from_components(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        Self::pack(
            timestamp & Self::TIMESTAMP_MASK,
            datacenter_id & Self::DATACENTER_ID_MASK,
            worker_id & Self::WORKER_ID_MASK,
            sequence & Self::SEQUENCE_MASK,
        )
    }

    /// Packs fields at their shifts without masking.
    ///
    /// Values wider than their field overlap their neighbours and timestamp
    /// bits shifted past bit 63 are dropped.
    pub(crate) const fn pack(
        timestamp: u64,
        datacenter_id: u64,
        worker_id: u64,
        sequence: u64,
    ) -> Self {
        Self {
            id: (timestamp << Self::TIMESTAMP_SHIFT)
                | (datacenter_id << Self::DATACENTER_ID_SHIFT)
                | (worker_id << Self::WORKER_ID_SHIFT)
                | sequence,
        }
    }

    /// Wraps a raw 64-bit value.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw 64-bit value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp (ms since [`TWITTER_EPOCH`]).
    ///
    /// [`TWITTER_EPOCH`]: crate::TWITTER_EPOCH
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the timestamp as milliseconds since the Unix epoch.
    pub const fn unix_millis(&self) -> u64 {
        self.timestamp() + TWITTER_EPOCH_MILLIS
    }

    /// Extracts the datacenter ID.
    pub const fn datacenter_id(&self) -> u64 {
        (self.id >> Self::DATACENTER_ID_SHIFT) & Self::DATACENTER_ID_MASK
    }

    /// Extracts the worker ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number.
    pub const fn sequence(&self) -> u64 {
        self.id & Self::SEQUENCE_MASK
    }

    /// Returns `true` if the reserved high bit is clear.
    pub const fn is_valid(&self) -> bool {
        self.id >> 63 == 0
    }
}

/// Checks a datacenter/worker pair against the field widths.
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] for the first value that does not fit.
pub const fn validate_identity(datacenter_id: u64, worker_id: u64) -> Result<()> {
    if datacenter_id > SnowflakeId::MAX_DATACENTER_ID {
        return Err(Error::OutOfRange {
            component: Component::Datacenter,
            value: datacenter_id,
            max: SnowflakeId::MAX_DATACENTER_ID,
        });
    }
    if worker_id > SnowflakeId::MAX_WORKER_ID {
        return Err(Error::OutOfRange {
            component: Component::Worker,
            value: worker_id,
            max: SnowflakeId::MAX_WORKER_ID,
        });
    }
    Ok(())
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl FromStr for SnowflakeId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from_raw(s.trim().parse()?))
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn layout_constants() {
        assert_eq!(SnowflakeId::TIMESTAMP_SHIFT, 22);
        assert_eq!(SnowflakeId::DATACENTER_ID_SHIFT, 17);
        assert_eq!(SnowflakeId::WORKER_ID_SHIFT, 12);
        assert_eq!(SnowflakeId::MAX_DATACENTER_ID, 31);
        assert_eq!(SnowflakeId::MAX_WORKER_ID, 31);
        assert_eq!(SnowflakeId::MAX_SEQUENCE, 4095);
        assert_eq!(
            SnowflakeId::TIMESTAMP_BITS
                + SnowflakeId::DATACENTER_ID_BITS
                + SnowflakeId::WORKER_ID_BITS
                + SnowflakeId::SEQUENCE_BITS,
            63
        );
    }

    #[test]
    fn known_values() {
        assert_eq!(SnowflakeId::from_components(0, 1, 1, 0).to_raw(), 135_168);
        assert_eq!(SnowflakeId::from_components(0, 1, 1, 1).to_raw(), 135_169);
        assert_eq!(135_168, (1 << 17) | (1 << 12));
        assert_eq!(SnowflakeId::from_components(1, 0, 0, 0).to_raw(), 1 << 22);
    }

    #[test]
    fn max_components_fill_low_63_bits() {
        let id = SnowflakeId::from_components(
            SnowflakeId::TIMESTAMP_MASK,
            SnowflakeId::MAX_DATACENTER_ID,
            SnowflakeId::MAX_WORKER_ID,
            SnowflakeId::MAX_SEQUENCE,
        );
        assert_eq!(id.to_raw(), u64::MAX >> 1);
        assert!(id.is_valid());
        assert!(!SnowflakeId::from_raw(u64::MAX).is_valid());
    }

    #[test]
    fn from_components_masks_overflowing_fields() {
        let id = SnowflakeId::from_components(7, 32, 33, 4096);
        assert_eq!(id.timestamp(), 7);
        assert_eq!(id.datacenter_id(), 0);
        assert_eq!(id.worker_id(), 1);
        assert_eq!(id.sequence(), 0);
    }

    #[test]
    fn pack_overlaps_overflowing_fields() {
        // worker 32 spills into the lowest datacenter bit
        let id = SnowflakeId::pack(0, 0, 32, 0);
        assert_eq!(id.datacenter_id(), 1);
        assert_eq!(id.worker_id(), 0);
    }

    #[test]
    fn identity_fields_round_trip() {
        for datacenter_id in 0..=SnowflakeId::MAX_DATACENTER_ID {
            for worker_id in 0..=SnowflakeId::MAX_WORKER_ID {
                let id = SnowflakeId::from_components(12_345, datacenter_id, worker_id, 99);
                assert_eq!(id.datacenter_id(), datacenter_id);
                assert_eq!(id.worker_id(), worker_id);
                assert_eq!(id.timestamp(), 12_345);
                assert_eq!(id.sequence(), 99);
            }
        }
    }

    #[test]
    fn unix_millis_adds_epoch() {
        let id = SnowflakeId::from_components(10, 0, 0, 0);
        assert_eq!(id.unix_millis(), 1_288_834_974_667);
    }

    #[test]
    fn validate_identity_bounds() {
        assert_eq!(validate_identity(31, 31), Ok(()));
        assert_eq!(
            validate_identity(32, 0),
            Err(Error::OutOfRange {
                component: Component::Datacenter,
                value: 32,
                max: 31
            })
        );
        assert_eq!(
            validate_identity(0, 40),
            Err(Error::OutOfRange {
                component: Component::Worker,
                value: 40,
                max: 31
            })
        );
    }

    #[test]
    fn parse_and_display() {
        let id: SnowflakeId = " 135168 ".parse().unwrap();
        assert_eq!(id.to_raw(), 135_168);
        assert_eq!(id.to_string(), "135168");
        assert!(matches!(
            "not-an-id".parse::<SnowflakeId>(),
            Err(Error::ParseId(_))
        ));
        assert!(matches!("-1".parse::<SnowflakeId>(), Err(Error::ParseId(_))));
    }

    #[test]
    fn ordering_follows_raw_value() {
        let a = SnowflakeId::from_components(1, 31, 31, 4095);
        let b = SnowflakeId::from_components(2, 0, 0, 0);
        assert!(a < b);
    }
}

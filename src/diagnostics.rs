/*
 * Debug-time checks of the binary contract.
 *
 * Two kinds of facts are verified here. Struct mirrors must have the size the
 * platform ABI documents; a mismatch means the mirror definition is wrong for
 * this target and is reported as a fatal assertion, never handled. Enums that
 * cross the boundary as raw integers declare a contiguous `MIN..=MAX` range,
 * so validating a raw value is a single comparison; `EnumRangeCache` remembers
 * values already validated and is owned by whoever runs the checks, so tests
 * can create as many independent caches as they like.
 */

use crate::error::{InteropError, Result};
use crate::native_structs::{
    InitCommonControlsEx, MenuItemInfo, NativeLayout, NotifyHeader, Point, PopupMenuParams, Rect,
    ToolInfo, ToolbarButtonInfo,
};

use std::any::TypeId;
use std::collections::HashSet;

const DEFAULT_ENUM_CACHE_CAPACITY: usize = 256;

/// Switches for the diagnostics layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Verify struct mirror sizes in `Diagnostics::run_startup_checks`.
    pub verify_layouts: bool,
    /// Validate raw enum values in `Diagnostics::check_enum`.
    pub validate_enums: bool,
    /// Number of validated `(enum, value)` pairs remembered before the cache
    /// resets. Zero disables caching.
    pub enum_cache_capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            verify_layouts: cfg!(debug_assertions),
            validate_enums: cfg!(debug_assertions),
            enum_cache_capacity: DEFAULT_ENUM_CACHE_CAPACITY,
        }
    }
}

// ── Enum range facts ──────────────────────────────────────────────────────────

/// An enum whose raw values form the contiguous range `MIN..=MAX`.
pub trait ContiguousEnum: Copy + 'static {
    const NAME: &'static str;
    const MIN: i32;
    const MAX: i32;
    /// Every declared variant, used to prove the range is contiguous.
    const VARIANTS: &'static [Self];

    fn to_raw(self) -> i32;

    #[inline]
    fn is_defined(raw: i32) -> bool {
        (Self::MIN..=Self::MAX).contains(&raw)
    }

    fn check(raw: i32) -> Result<()> {
        if Self::is_defined(raw) {
            Ok(())
        } else {
            Err(InteropError::EnumOutOfRange {
                enum_name: Self::NAME,
                value: raw,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }
}

/// True when the declared variants cover `MIN..=MAX` exactly, with no gaps.
pub fn declared_range_is_contiguous<E: ContiguousEnum>() -> bool {
    let mut raws: Vec<i32> = E::VARIANTS.iter().map(|variant| variant.to_raw()).collect();
    raws.sort_unstable();
    raws.dedup();
    raws.len() == E::VARIANTS.len()
        && raws.first() == Some(&E::MIN)
        && raws.last() == Some(&E::MAX)
        && raws.windows(2).all(|pair| pair[1] == pair[0] + 1)
}

/// Bounded memory of `(enum type, raw value)` pairs that already passed validation.
#[derive(Debug)]
pub struct EnumRangeCache {
    capacity: usize,
    validated: HashSet<(TypeId, i32)>,
    resets: usize,
}

impl EnumRangeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            validated: HashSet::new(),
            resets: 0,
        }
    }

    /// Validates `raw` for `E`. Only values that pass are remembered; when the
    /// cache is full it is cleared before the new entry is added.
    pub fn check<E: ContiguousEnum>(&mut self, raw: i32) -> Result<()> {
        let key = (TypeId::of::<E>(), raw);
        if self.validated.contains(&key) {
            return Ok(());
        }
        E::check(raw)?;
        if self.capacity == 0 {
            return Ok(());
        }
        if self.validated.len() >= self.capacity {
            log::debug!(
                "Diagnostics: enum range cache reached {} entries, resetting",
                self.capacity
            );
            self.validated.clear();
            self.resets += 1;
        }
        self.validated.insert(key);
        Ok(())
    }

    pub fn contains<E: ContiguousEnum>(&self, raw: i32) -> bool {
        self.validated.contains(&(TypeId::of::<E>(), raw))
    }

    pub fn len(&self) -> usize {
        self.validated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validated.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many times the cache overflowed and was cleared.
    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn clear(&mut self) {
        self.validated.clear();
    }
}

// ── Struct layout facts ───────────────────────────────────────────────────────

/// Size comparison for one mirrored structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutCheck {
    pub structure: &'static str,
    pub mirror_size: usize,
    pub native_size: usize,
}

impl LayoutCheck {
    pub fn of<T: NativeLayout>() -> Self {
        Self {
            structure: T::NAME,
            mirror_size: size_of::<T>(),
            native_size: T::NATIVE_SIZE,
        }
    }

    pub fn matches(&self) -> bool {
        self.mirror_size == self.native_size
    }

    fn into_result(self) -> Result<()> {
        if self.matches() {
            Ok(())
        } else {
            Err(InteropError::LayoutMismatch {
                structure: self.structure,
                mirror_size: self.mirror_size,
                native_size: self.native_size,
            })
        }
    }
}

/// Documented-size comparison for every mirror in the crate.
pub fn layout_report() -> Vec<LayoutCheck> {
    vec![
        LayoutCheck::of::<Point>(),
        LayoutCheck::of::<Rect>(),
        LayoutCheck::of::<NotifyHeader>(),
        LayoutCheck::of::<ToolInfo>(),
        LayoutCheck::of::<MenuItemInfo>(),
        LayoutCheck::of::<ToolbarButtonInfo>(),
        LayoutCheck::of::<InitCommonControlsEx>(),
        LayoutCheck::of::<PopupMenuParams>(),
    ]
}

/// Checks one mirror against its documented size.
pub fn verify_layout<T: NativeLayout>() -> Result<()> {
    LayoutCheck::of::<T>().into_result()
}

/*
 * Checks every mirror against its documented size and, on Windows, against the
 * `windows` crate's definition of the same structure. Returns the first mismatch.
 */
pub fn verify_struct_layouts() -> Result<()> {
    for check in layout_report() {
        check.into_result()?;
    }
    #[cfg(target_os = "windows")]
    for check in crate::win32_api::platform_layout_report() {
        check.into_result()?;
    }
    Ok(())
}

/// Panics on a mirror size mismatch in debug builds; does nothing in release.
pub fn assert_struct_layouts() {
    if cfg!(debug_assertions) {
        if let Err(err) = verify_struct_layouts() {
            panic!("native struct layout contract broken: {err}");
        }
    }
}

/// Diagnostics state for one toolkit instance or test.
#[derive(Debug)]
pub struct Diagnostics {
    config: DiagnosticsConfig,
    enum_cache: EnumRangeCache,
}

impl Diagnostics {
    pub fn new(config: DiagnosticsConfig) -> Self {
        let enum_cache = EnumRangeCache::new(config.enum_cache_capacity);
        Self { config, enum_cache }
    }

    pub fn config(&self) -> &DiagnosticsConfig {
        &self.config
    }

    pub fn enum_cache(&self) -> &EnumRangeCache {
        &self.enum_cache
    }

    /// Runs the layout verification if enabled. A mismatch is fatal.
    pub fn run_startup_checks(&self) {
        if !self.config.verify_layouts {
            return;
        }
        if let Err(err) = verify_struct_layouts() {
            log::error!("Diagnostics: {err}");
            panic!("native struct layout contract broken: {err}");
        }
        log::debug!("Diagnostics: {} struct mirrors verified", layout_report().len());
    }

    /// Validates a raw enum value if enabled; disabled checks always pass.
    pub fn check_enum<E: ContiguousEnum>(&mut self, raw: i32) -> Result<()> {
        if !self.config.validate_enums {
            return Ok(());
        }
        self.enum_cache.check::<E>(raw).inspect_err(|err| {
            log::warn!("Diagnostics: {err}");
        })
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DiagnosticsConfig::default())
    }
}

//!  Mask flag and key.

/// Payload mask with a 32-bit key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Key([u8; 4]),
    None,
}

impl Mask {
    /// Whether the flag byte announces a mask key.
    #[inline]
    pub const fn is_flag_set(b: u8) -> bool { b & 0x80 == 0x80 }

    /// Get the flag byte.
    #[inline]
    pub const fn to_flag(self) -> u8 {
        match self {
            Mask::Key(_) => 0x80,
            Mask::None => 0x00,
        }
    }

    #[inline]
    pub const fn key(self) -> Option<[u8; 4]> {
        match self {
            Mask::Key(k) => Some(k),
            Mask::None => None,
        }
    }
}

impl From<Option<[u8; 4]>> for Mask {
    fn from(key: Option<[u8; 4]>) -> Self {
        match key {
            Some(k) => Mask::Key(k),
            None => Mask::None,
        }
    }
}

/// Generate a new random key.
#[inline]
pub fn new_mask_key() -> [u8; 4] { rand::random::<[u8; 4]>() }

/// Mask the buffer, byte by byte.
#[inline]
pub fn apply_mask(key: [u8; 4], buf: &mut [u8]) {
    for (i, b) in buf.iter_mut().enumerate() {
        *b ^= key[i & 0x03];
    }
}

/// Mask the buffer, 4 bytes at a time.
#[inline]
pub fn apply_mask4(key: [u8; 4], buf: &mut [u8]) {
    // SAFETY: any bit pattern is a valid u32
    let (prefix, middle, suffix) = unsafe { buf.align_to_mut::<u32>() };

    apply_mask(key, prefix);

    // the key continues where the unaligned prefix stopped
    let head = prefix.len() & 3;
    let mut key = key;
    key.rotate_left(head);
    let key4 = u32::from_ne_bytes(key);

    for b4 in middle.iter_mut() {
        *b4 ^= key4;
    }

    apply_mask(key, suffix);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mask_flag() {
        assert!(Mask::is_flag_set(Mask::Key([1, 2, 3, 4]).to_flag()));
        assert!(!Mask::is_flag_set(Mask::None.to_flag()));
    }

    #[test]
    fn mask_cyclic() {
        let key = [0x01, 0x02, 0x04, 0x08];
        let mut buf = [0u8; 6];
        apply_mask(key, &mut buf);
        assert_eq!(buf, [0x01, 0x02, 0x04, 0x08, 0x01, 0x02]);
    }

    #[test]
    fn mask_byte() {
        let key: [u8; 4] = rand::random();
        let buf: Vec<u8> = (0..1024).map(|_| rand::random::<u8>()).collect();

        let mut buf2 = buf.clone();
        apply_mask(key, &mut buf2);
        apply_mask(key, &mut buf2);

        assert_eq!(buf, buf2);
    }

    #[test]
    fn mask_byte4() {
        for i in 0..1024 {
            let key: [u8; 4] = rand::random();
            let buf: Vec<u8> = (0..i).map(|_| rand::random::<u8>()).collect();

            // both implementations must agree, whatever the alignment
            for offset in 0..std::cmp::min(4, i + 1) {
                let mut a = buf.clone();
                let mut b = buf.clone();
                apply_mask(key, &mut a[offset..]);
                apply_mask4(key, &mut b[offset..]);
                assert_eq!(a, b);
            }
        }
    }
}

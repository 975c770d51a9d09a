// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounds-checked integer reads from byte buffers.

fn array<const N: usize>(data: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    data.get(offset..end)?.try_into().ok()
}

pub(crate) fn u8_at(data: &[u8], offset: usize) -> Option<u8> {
    data.get(offset).copied()
}

pub(crate) fn u16_le(data: &[u8], offset: usize) -> Option<u16> {
    array(data, offset).map(u16::from_le_bytes)
}

pub(crate) fn u32_le(data: &[u8], offset: usize) -> Option<u32> {
    array(data, offset).map(u32::from_le_bytes)
}

pub(crate) fn u16_be(data: &[u8], offset: usize) -> Option<u16> {
    array(data, offset).map(u16::from_be_bytes)
}

pub(crate) fn i16_be(data: &[u8], offset: usize) -> Option<i16> {
    array(data, offset).map(i16::from_be_bytes)
}

pub(crate) fn u32_be(data: &[u8], offset: usize) -> Option<u32> {
    array(data, offset).map(u32::from_be_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_endiannesses() {
        let data = [0x12, 0x34, 0x56, 0x78];
        assert_eq!(u16_le(&data, 0), Some(0x3412));
        assert_eq!(u16_be(&data, 0), Some(0x1234));
        assert_eq!(u32_le(&data, 0), Some(0x7856_3412));
        assert_eq!(u32_be(&data, 0), Some(0x1234_5678));
        assert_eq!(i16_be(&[0xFF, 0xFE], 0), Some(-2));
        assert_eq!(u8_at(&data, 3), Some(0x78));
    }

    #[test]
    fn out_of_bounds_reads_are_none() {
        let data = [0u8; 3];
        assert_eq!(u16_le(&data, 2), None);
        assert_eq!(u32_le(&data, 0), None);
        assert_eq!(u8_at(&data, 3), None);
        assert_eq!(u16_be(&data, usize::MAX), None);
    }
}

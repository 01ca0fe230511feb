//! std140 packing of animated uniforms
//!
//! Floats take one 4-byte slot. Colors are widened to `vec4` with alpha 1 and
//! start on a 16-byte boundary. The block is padded to a multiple of 16 bytes
//! so it can be copied straight into a uniform buffer.

use super::UniformValue;

const VEC4_WORDS: usize = 4;

/// Pack values in order into a std140-compatible byte block
pub fn pack_std140(values: &[UniformValue]) -> Vec<u8> {
    let mut words: Vec<f32> = Vec::with_capacity(values.len() * VEC4_WORDS);

    for value in values {
        match value {
            UniformValue::Float(scalar) => words.push(*scalar),
            UniformValue::Color(color) => {
                pad_to_vec4(&mut words);
                words.extend_from_slice(&color.to_array());
            }
        }
    }
    pad_to_vec4(&mut words);

    bytemuck::cast_slice::<f32, u8>(&words).to_vec()
}

fn pad_to_vec4(words: &mut Vec<f32>) {
    while words.len() % VEC4_WORDS != 0 {
        words.push(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::color::Color;

    fn floats(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|word| f32::from_ne_bytes([word[0], word[1], word[2], word[3]]))
            .collect()
    }

    #[test]
    fn test_empty_block() {
        assert!(pack_std140(&[]).is_empty());
    }

    #[test]
    fn test_color_aligned_to_sixteen_bytes() {
        let bytes = pack_std140(&[
            UniformValue::Float(2.5),
            UniformValue::Color(Color::new(1.0, 0.5, 0.0)),
            UniformValue::Float(30.0),
        ]);

        assert_eq!(bytes.len(), 48);
        assert_eq!(
            floats(&bytes),
            [2.5, 0.0, 0.0, 0.0, 1.0, 0.5, 0.0, 1.0, 30.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_consecutive_floats_share_a_slot() {
        let bytes = pack_std140(&[UniformValue::Float(1.0), UniformValue::Float(2.0)]);
        assert_eq!(floats(&bytes), [1.0, 2.0, 0.0, 0.0]);
    }
}

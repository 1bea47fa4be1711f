//! Named scales and the `cycle` indexer.
//!
//! A [`Scale`] is a tonic pitch plus a fixed set of pitch classes;
//! indexing it (via [`Scale::get`]) wraps the index modulo the scale's
//! degree count and adds the tonic, giving an absolute pitch. [`Cycle`]
//! walks a repeating list of scale-degree indices across one scale, or
//! across a sequence of scales.
//!
//! Grounded in `crispy/scales.py`: each `class Foo(Scale): _pitchclasses =
//! (...)` there becomes a constructor function here returning a `Scale`
//! built from the same pitch-class tuple.

/// A tonic pitch plus an ordered set of scale-degree offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scale {
    tonic: i32,
    pitch_classes: &'static [i32],
}

impl Scale {
    fn new(tonic: i32, pitch_classes: &'static [i32]) -> Self {
        Self {
            tonic,
            pitch_classes,
        }
    }

    pub fn tonic(&self) -> i32 {
        self.tonic
    }

    pub fn pitch_classes(&self) -> &'static [i32] {
        self.pitch_classes
    }

    /// The absolute pitch at scale degree `index`, wrapping modulo the
    /// scale's own length (negative indices wrap backwards, as in Python).
    pub fn get(&self, index: i32) -> i32 {
        let len = self.pitch_classes.len() as i32;
        let wrapped = index.rem_euclid(len);
        self.tonic + self.pitch_classes[wrapped as usize]
    }
}

/// Walks a fixed list of scale-degree indices, either over one [`Scale`]
/// or, repeated, over a sequence of them.
#[derive(Debug, Clone)]
pub struct Cycle {
    pub index: Vec<i32>,
}

impl Cycle {
    pub fn new(index: Vec<i32>) -> Self {
        Self { index }
    }

    /// The pitches `scale.get(i)` for each `i` in `self.index`, in order.
    pub fn over(&self, scale: &Scale) -> Vec<i32> {
        self.index.iter().map(|&i| scale.get(i)).collect()
    }

    /// The same walk repeated once per scale in `scales`, concatenated.
    pub fn over_many<'a>(&self, scales: impl IntoIterator<Item = &'a Scale>) -> Vec<i32> {
        scales
            .into_iter()
            .flat_map(|scale| self.index.iter().map(move |&i| scale.get(i)))
            .collect()
    }
}

macro_rules! scale_fn {
    ($name:ident, $pcs:expr) => {
        pub fn $name(tonic: i32) -> Scale {
            Scale::new(tonic, &$pcs)
        }
    };
}

scale_fn!(acoustic, [0, 2, 4, 6, 7, 9, 10]);
scale_fn!(altered, [0, 1, 3, 4, 6, 8, 10]);
scale_fn!(augmented, [0, 3, 4, 7, 8, 11]);
scale_fn!(bebop, [0, 2, 4, 5, 7, 9, 10, 11]);
scale_fn!(blues, [0, 3, 5, 6, 7, 10]);
scale_fn!(chromatic, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
scale_fn!(dorian, [0, 2, 3, 5, 7, 9, 10]);
scale_fn!(double_harm, [0, 1, 4, 5, 7, 8, 11]);
scale_fn!(enigmatic, [0, 1, 4, 6, 8, 10, 11]);
scale_fn!(flamenco, [0, 1, 4, 5, 7, 8, 11]);
scale_fn!(gypsy, [0, 2, 3, 6, 7, 8, 10]);
scale_fn!(half_diminished, [0, 2, 3, 5, 6, 8, 10]);
scale_fn!(hirajoshi, [0, 4, 6, 7, 11]);
scale_fn!(r#in, [0, 1, 5, 7, 8]);
scale_fn!(insen, [0, 1, 5, 7, 10]);
scale_fn!(iwato, [0, 1, 5, 6, 10]);
scale_fn!(locrian, [0, 1, 3, 5, 6, 8, 10]);
scale_fn!(locrian_sharp6, [0, 1, 3, 5, 6, 9, 10]);
scale_fn!(lydian, [0, 2, 4, 6, 7, 9, 11]);
scale_fn!(lydian_augmented, [0, 2, 4, 6, 8, 9, 11]);
scale_fn!(lydian_diminished, [0, 2, 3, 6, 7, 9, 11]);
scale_fn!(maj, [0, 2, 4, 5, 7, 9, 11]);
scale_fn!(maj_harm, [0, 2, 4, 5, 7, 8, 11]);
scale_fn!(maj_hungarian, [0, 3, 4, 6, 7, 9, 10]);
scale_fn!(maj_locrian, [0, 2, 4, 5, 6, 8, 10]);
scale_fn!(maj_neapolitan, [0, 1, 3, 5, 7, 9, 11]);
scale_fn!(maj_pent, [0, 2, 4, 7, 9]);
scale_fn!(min_harm, [0, 2, 3, 5, 7, 8, 11]);
scale_fn!(min_hungarian, [0, 2, 3, 6, 7, 8, 11]);
scale_fn!(min_melodic, [0, 2, 3, 5, 7, 9, 11]);
scale_fn!(min_nat, [0, 2, 3, 5, 7, 8, 10]);
scale_fn!(min_neapolitan, [0, 1, 3, 5, 7, 8, 11]);
scale_fn!(min_pent, [0, 3, 5, 7, 10]);
scale_fn!(mixolydian, [0, 2, 4, 5, 7, 9, 10]);
scale_fn!(octatonic, [0, 2, 3, 5, 6, 8, 9, 11]);
scale_fn!(persian, [0, 1, 4, 5, 6, 8, 11]);
scale_fn!(phrygian, [0, 1, 3, 5, 7, 8, 10]);
scale_fn!(phrygian_dominant, [0, 1, 4, 5, 7, 8, 10]);
scale_fn!(prometheus, [0, 2, 4, 6, 9, 10]);
scale_fn!(tritone, [0, 1, 4, 6, 7, 10]);
scale_fn!(tritone_semi2, [0, 1, 2, 6, 7, 8]);
scale_fn!(ukrainian_dorian, [0, 2, 3, 6, 7, 9, 10]);
scale_fn!(whole_tone, [0, 2, 4, 6, 8, 10]);
scale_fn!(yo, [0, 2, 5, 7, 9]);

/// `Ionian` is the traditional alias for the major scale.
pub fn ionian(tonic: i32) -> Scale {
    maj(tonic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_wraps_and_adds_tonic() {
        let c_major = maj(60);
        assert_eq!(c_major.get(0), 60);
        assert_eq!(c_major.get(2), 64);
        assert_eq!(c_major.get(7), 72);
        assert_eq!(c_major.get(-1), 60 + 11);
    }

    #[test]
    fn ionian_is_maj() {
        assert_eq!(ionian(60).pitch_classes(), maj(60).pitch_classes());
    }

    #[test]
    fn cycle_walks_degrees_over_one_scale() {
        let degrees = Cycle::new(vec![0, 2, 4]);
        assert_eq!(degrees.over(&dorian(48)), vec![48, 51, 55]);
    }

    #[test]
    fn cycle_walks_degrees_over_many_scales() {
        let degrees = Cycle::new(vec![0, 1]);
        let scales = vec![maj(60), min_nat(60)];
        assert_eq!(degrees.over_many(&scales), vec![60, 62, 60, 62]);
    }
}

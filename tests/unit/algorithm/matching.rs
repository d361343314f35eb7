//! Tests for batched nearest-color matching and its tie-breaking rule

#[cfg(test)]
mod tests {
    use ndarray::{Array2, Array3, array};
    use tilemosaic::MosaicError;
    use tilemosaic::algorithm::matching::{match_tiles, nearest_tile, squared_distances};
    use tilemosaic::io::configuration::MATCH_CHUNK_CELLS;
    use tilemosaic::math::color::squared_distance;

    fn palette() -> Array2<f64> {
        array![
            [0.0, 0.0, 0.0],
            [255.0, 255.0, 255.0],
            [255.0, 0.0, 0.0],
            [0.0, 0.0, 255.0],
        ]
    }

    // Tests cells equal to a tile color match that tile
    // Verified by returning the argmax instead of the argmin
    #[test]
    fn test_exact_matches() -> Result<(), MosaicError> {
        let cells = Array3::from_shape_vec(
            (2, 2, 3),
            vec![
                255.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 255.0, 255.0, 255.0, 255.0,
            ],
        )
        .map_err(|e| tilemosaic::io::error::invalid_parameter("cells", &"2x2", &e))?;

        let matches = match_tiles(&cells.view(), &palette().view())?;
        assert_eq!(matches, array![[2, 0], [3, 1]]);
        Ok(())
    }

    // Tests equidistant tiles resolve to the lowest index
    // Verified by using a non-strict comparison in the argmin
    #[test]
    fn test_ties_pick_lowest_index() -> Result<(), MosaicError> {
        let tiles = array![[90.0, 90.0, 90.0], [110.0, 110.0, 110.0], [90.0, 90.0, 90.0]];
        let cells = Array3::from_elem((1, 1, 3), 100.0);

        let matches = match_tiles(&cells.view(), &tiles.view())?;
        assert_eq!(matches, array![[0]]);

        let duplicates = array![[5.0, 5.0, 5.0], [1.0, 1.0, 1.0], [1.0, 1.0, 1.0]];
        assert_eq!(nearest_tile(&[0.0, 0.0, 0.0], &duplicates.view())?, 1);
        Ok(())
    }

    // Tests a single tile is chosen for every cell without error
    // Verified by rejecting single-tile tables
    #[test]
    fn test_single_tile() -> Result<(), MosaicError> {
        let tiles = array![[12.0, 34.0, 56.0]];
        let cells = Array3::from_shape_fn((3, 4, 3), |(r, c, k)| (r * 50 + c * 20 + k) as f64);
        let matches = match_tiles(&cells.view(), &tiles.view())?;
        assert_eq!(matches.dim(), (3, 4));
        assert!(matches.iter().all(|&index| index == 0));
        Ok(())
    }

    // Tests the chosen tile is never beaten by another tile
    // Verified by offsetting the argmin index by one
    #[test]
    fn test_choice_is_minimum_distance() -> Result<(), MosaicError> {
        let tiles = Array2::from_shape_fn((17, 3), |(t, k)| ((t * 67 + k * 101) % 256) as f64);
        let cells = Array3::from_shape_fn((9, 7, 3), |(r, c, k)| {
            ((r * 29 + c * 53 + k * 11) % 256) as f64 + 0.25
        });

        let matches = match_tiles(&cells.view(), &tiles.view())?;
        for ((r, c), &chosen) in matches.indexed_iter() {
            let cell = [cells[[r, c, 0]], cells[[r, c, 1]], cells[[r, c, 2]]];
            let tile_color = |t: usize| [tiles[[t, 0]], tiles[[t, 1]], tiles[[t, 2]]];
            let best = squared_distance(&cell, &tile_color(chosen));
            for t in 0..tiles.nrows() {
                let other = squared_distance(&cell, &tile_color(t));
                assert!(other >= best);
                if t < chosen {
                    assert!(other > best, "tie not resolved to lowest index");
                }
            }
        }
        Ok(())
    }

    // Tests ordering survives splitting cells into several chunks
    // Verified by restarting indices at every chunk
    #[test]
    fn test_chunked_matching_keeps_order() -> Result<(), MosaicError> {
        let side = 40;
        assert!(side * side > MATCH_CHUNK_CELLS);
        let tiles = palette();
        let cells = Array3::from_shape_fn((side, side, 3), |(r, c, _)| {
            if (r + c) % 2 == 0 { 250.0 } else { 3.0 }
        });

        let matches = match_tiles(&cells.view(), &tiles.view())?;
        for ((r, c), &chosen) in matches.indexed_iter() {
            let expected = if (r + c) % 2 == 0 { 1 } else { 0 };
            assert_eq!(chosen, expected);
        }
        Ok(())
    }

    // Tests the distance matrix shape and values
    // Verified by summing absolute differences
    #[test]
    fn test_squared_distances() {
        let cells = array![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]];
        let tiles = array![[1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [4.0, 6.0, 3.0]];
        let distances = squared_distances(&cells.view(), &tiles.view());
        assert_eq!(
            distances,
            array![[3.0, 0.0, 61.0], [5.0, 14.0, 25.0]]
        );
    }

    // Tests invalid tables are rejected
    // Verified by removing the tile count check
    #[test]
    fn test_invalid_inputs() {
        let cells = Array3::<f64>::zeros((2, 2, 3));
        let no_tiles = Array2::<f64>::zeros((0, 3));
        assert!(matches!(
            match_tiles(&cells.view(), &no_tiles.view()),
            Err(MosaicError::InvalidParameter { .. })
        ));

        let two_channel_tiles = Array2::<f64>::zeros((2, 2));
        assert!(match_tiles(&cells.view(), &two_channel_tiles.view()).is_err());

        let four_channel_cells = Array3::<f64>::zeros((2, 2, 4));
        assert!(match_tiles(&four_channel_cells.view(), &palette().view()).is_err());
    }
}

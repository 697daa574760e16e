use anyhow::{Result, bail};

pub const POOL_SIZE: u8 = 45;
pub const PICK_COUNT: usize = 6;
/// Borne haute de la zone basse (1-22 : bas, 23-45 : haut).
pub const LOW_MAX: u8 = 22;

/// Une grille : 6 numéros distincts dans 1-45, triés par ordre croissant.
pub type Grid = [u8; 6];

pub fn validate_numbers(nums: &Grid) -> Result<()> {
    for &n in nums {
        if n < 1 || n > POOL_SIZE {
            bail!("Numéro {} hors limites (1-{})", n, POOL_SIZE);
        }
    }
    for i in 0..nums.len() {
        for j in (i + 1)..nums.len() {
            if nums[i] == nums[j] {
                bail!("Numéro en double : {}", nums[i]);
            }
        }
    }
    Ok(())
}

pub fn sum(nums: &Grid) -> u16 {
    nums.iter().map(|&n| n as u16).sum()
}

pub fn odd_count(nums: &Grid) -> u8 {
    nums.iter().filter(|&&n| n % 2 != 0).count() as u8
}

pub fn low_count(nums: &Grid) -> u8 {
    nums.iter().filter(|&&n| n <= LOW_MAX).count() as u8
}

/// Longueur de la plus longue suite de numéros consécutifs.
pub fn max_consecutive(nums: &Grid) -> u8 {
    let mut sorted = *nums;
    sorted.sort();

    let mut max_run = 1u8;
    let mut current_run = 1u8;
    for w in sorted.windows(2) {
        if w[0] + 1 == w[1] {
            current_run += 1;
        } else {
            max_run = max_run.max(current_run);
            current_run = 1;
        }
    }
    max_run.max(current_run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_numbers_ok() {
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 6]).is_ok());
        assert!(validate_numbers(&[40, 41, 42, 43, 44, 45]).is_ok());
    }

    #[test]
    fn test_validate_numbers_out_of_range() {
        assert!(validate_numbers(&[0, 2, 3, 4, 5, 6]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 5, 46]).is_err());
    }

    #[test]
    fn test_validate_numbers_duplicate() {
        assert!(validate_numbers(&[1, 1, 3, 4, 5, 6]).is_err());
        assert!(validate_numbers(&[1, 2, 3, 4, 45, 45]).is_err());
    }

    #[test]
    fn test_sum() {
        assert_eq!(sum(&[1, 2, 3, 4, 5, 6]), 21);
        assert_eq!(sum(&[40, 41, 42, 43, 44, 45]), 255);
    }

    #[test]
    fn test_odd_count() {
        assert_eq!(odd_count(&[1, 3, 5, 7, 9, 11]), 6);
        assert_eq!(odd_count(&[2, 4, 6, 8, 10, 12]), 0);
        assert_eq!(odd_count(&[1, 2, 3, 4, 5, 6]), 3);
    }

    #[test]
    fn test_low_count() {
        assert_eq!(low_count(&[1, 5, 10, 15, 20, 22]), 6);
        assert_eq!(low_count(&[23, 30, 35, 40, 44, 45]), 0);
        assert_eq!(low_count(&[1, 22, 23, 30, 40, 45]), 2);
    }

    #[test]
    fn test_max_consecutive_no_run() {
        assert_eq!(max_consecutive(&[1, 5, 10, 20, 30, 40]), 1);
    }

    #[test]
    fn test_max_consecutive_pair() {
        assert_eq!(max_consecutive(&[1, 2, 10, 20, 30, 40]), 2);
    }

    #[test]
    fn test_max_consecutive_middle_run() {
        assert_eq!(max_consecutive(&[1, 10, 11, 12, 30, 40]), 3);
    }

    #[test]
    fn test_max_consecutive_run_at_end() {
        assert_eq!(max_consecutive(&[1, 10, 20, 43, 44, 45]), 3);
    }

    #[test]
    fn test_max_consecutive_full_run() {
        assert_eq!(max_consecutive(&[7, 8, 9, 10, 11, 12]), 6);
    }

    #[test]
    fn test_max_consecutive_unsorted_input() {
        assert_eq!(max_consecutive(&[12, 7, 9, 11, 8, 10]), 6);
    }
}

use crate::breed::types::{BreedPrediction, RankedPredictions};
use crate::labels::LabelTable;
use crate::utils::error::BreedError;
use crate::Result;
use std::cmp::Ordering;

/// 预测结果排序器
pub struct PredictionRanker;

impl PredictionRanker {
    /// 按得分降序得到前 top_k 个候选；同分按类别索引升序。
    /// 得分数量与标签数量不一致是致命配置错误，绝不输出错位标签。
    pub fn rank(scores: &[f32], labels: &LabelTable, top_k: usize) -> Result<RankedPredictions> {
        if scores.len() != labels.len() {
            return Err(BreedError::ShapeMismatch(scores.len(), labels.len()));
        }

        let mut order: Vec<usize> = (0..scores.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.cmp(&b))
        });

        let top_k = top_k.clamp(1, scores.len());
        let names = labels.names();
        let predictions: Vec<BreedPrediction> = order
            .iter()
            .take(top_k)
            .map(|&idx| BreedPrediction {
                class_index: idx,
                breed: names[idx].clone(),
                confidence: scores[idx] * 100.0,
            })
            .collect();

        let top = predictions
            .first()
            .cloned()
            .ok_or_else(|| BreedError::Internal("Ranking produced no predictions".to_string()))?;

        Ok(RankedPredictions { top, predictions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[&str]) -> LabelTable {
        LabelTable::from_names(names.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn ranks_top_three_with_index_tie_break() {
        let labels = table(&["A", "B", "C", "D", "E"]);
        let scores = [0.1, 0.7, 0.05, 0.1, 0.05];

        let ranked = PredictionRanker::rank(&scores, &labels, 3).unwrap();

        assert_eq!(ranked.top.breed, "B");
        assert_eq!(ranked.top.class_index, 1);
        assert!((ranked.top.confidence - 70.0).abs() < 1e-3);

        let ordered: Vec<&str> = ranked
            .predictions
            .iter()
            .map(|p| p.breed.as_str())
            .collect();
        // 0.1 并列时索引小的 A 排在 D 前面
        assert_eq!(ordered, vec!["B", "A", "D"]);
    }

    #[test]
    fn score_and_label_width_mismatch_is_fatal() {
        let labels = LabelTable::embedded().unwrap();
        let scores = vec![0.0f32; 119];

        let err = PredictionRanker::rank(&scores, &labels, 3).unwrap_err();
        match err {
            BreedError::ShapeMismatch(got, expected) => {
                assert_eq!(got, 119);
                assert_eq!(expected, 120);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn top_k_is_clamped_to_class_count() {
        let labels = table(&["A", "B", "C"]);
        let scores = [0.2, 0.5, 0.3];

        let ranked = PredictionRanker::rank(&scores, &labels, 10).unwrap();
        assert_eq!(ranked.predictions.len(), 3);

        let ranked = PredictionRanker::rank(&scores, &labels, 0).unwrap();
        assert_eq!(ranked.predictions.len(), 1);
        assert_eq!(ranked.top.breed, "B");
    }

    #[test]
    fn confidence_is_score_times_hundred() {
        let labels = table(&["A", "B"]);
        let scores = [0.0766, 0.9234];

        let ranked = PredictionRanker::rank(&scores, &labels, 2).unwrap();
        assert!((ranked.predictions[0].confidence - 92.34).abs() < 1e-2);
        assert!((ranked.predictions[1].confidence - 7.66).abs() < 1e-2);
    }
}

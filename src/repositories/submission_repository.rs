use crate::entities::{module, module_submission, quiz, quiz_submission, task, task_submission};
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, JoinType,
    QueryFilter, QuerySelect, RelationTrait, Set,
};
use serde_json::Value;
use uuid::Uuid;

/// Module, quiz and task submissions, keyed by (item, enrollment).
pub struct SubmissionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SubmissionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_module_submission(
        &self,
        module_id: Uuid,
        training_user_id: Uuid,
    ) -> Result<Option<module_submission::Model>, DbErr> {
        module_submission::Entity::find()
            .filter(module_submission::Column::ModuleId.eq(module_id))
            .filter(module_submission::Column::TrainingUserId.eq(training_user_id))
            .one(self.db)
            .await
    }

    pub async fn find_quiz_submission(
        &self,
        quiz_id: Uuid,
        training_user_id: Uuid,
    ) -> Result<Option<quiz_submission::Model>, DbErr> {
        quiz_submission::Entity::find()
            .filter(quiz_submission::Column::QuizId.eq(quiz_id))
            .filter(quiz_submission::Column::TrainingUserId.eq(training_user_id))
            .one(self.db)
            .await
    }

    pub async fn find_task_submission(
        &self,
        task_id: Uuid,
        training_user_id: Uuid,
    ) -> Result<Option<task_submission::Model>, DbErr> {
        task_submission::Entity::find()
            .filter(task_submission::Column::TaskId.eq(task_id))
            .filter(task_submission::Column::TrainingUserId.eq(training_user_id))
            .one(self.db)
            .await
    }

    /// Inserts or replaces the answer; an existing grade is kept.
    pub async fn upsert_module_answer(
        &self,
        module_id: Uuid,
        training_user_id: Uuid,
        answer: String,
    ) -> Result<module_submission::Model, DbErr> {
        let submission = module_submission::ActiveModel {
            id: Set(Uuid::new_v4()),
            module_id: Set(module_id),
            training_user_id: Set(training_user_id),
            answer: Set(Some(answer)),
            score: Set(None),
            submitted_at: Set(Utc::now().naive_utc()),
            graded_at: Set(None),
        };

        module_submission::Entity::insert(submission)
            .on_conflict(
                OnConflict::columns([
                    module_submission::Column::ModuleId,
                    module_submission::Column::TrainingUserId,
                ])
                .update_columns([
                    module_submission::Column::Answer,
                    module_submission::Column::SubmittedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        self.find_module_submission(module_id, training_user_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("module submission".to_string()))
    }

    pub async fn upsert_task_answer(
        &self,
        task_id: Uuid,
        training_user_id: Uuid,
        answer: String,
    ) -> Result<task_submission::Model, DbErr> {
        let submission = task_submission::ActiveModel {
            id: Set(Uuid::new_v4()),
            task_id: Set(task_id),
            training_user_id: Set(training_user_id),
            answer: Set(Some(answer)),
            score: Set(None),
            submitted_at: Set(Utc::now().naive_utc()),
            graded_at: Set(None),
        };

        task_submission::Entity::insert(submission)
            .on_conflict(
                OnConflict::columns([
                    task_submission::Column::TaskId,
                    task_submission::Column::TrainingUserId,
                ])
                .update_columns([
                    task_submission::Column::Answer,
                    task_submission::Column::SubmittedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        self.find_task_submission(task_id, training_user_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("task submission".to_string()))
    }

    /// Quiz attempts are scored on submission, so answers and score are
    /// replaced together.
    pub async fn upsert_quiz_attempt(
        &self,
        quiz_id: Uuid,
        training_user_id: Uuid,
        answers: Value,
        score: i32,
    ) -> Result<quiz_submission::Model, DbErr> {
        let submission = quiz_submission::ActiveModel {
            id: Set(Uuid::new_v4()),
            quiz_id: Set(quiz_id),
            training_user_id: Set(training_user_id),
            answers: Set(Some(answers)),
            score: Set(Some(score)),
            submitted_at: Set(Utc::now().naive_utc()),
        };

        quiz_submission::Entity::insert(submission)
            .on_conflict(
                OnConflict::columns([
                    quiz_submission::Column::QuizId,
                    quiz_submission::Column::TrainingUserId,
                ])
                .update_columns([
                    quiz_submission::Column::Answers,
                    quiz_submission::Column::Score,
                    quiz_submission::Column::SubmittedAt,
                ])
                .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        self.find_quiz_submission(quiz_id, training_user_id)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("quiz submission".to_string()))
    }

    pub async fn grade_module_submission(
        &self,
        submission: module_submission::Model,
        score: i32,
    ) -> Result<module_submission::Model, DbErr> {
        let mut active_model: module_submission::ActiveModel = submission.into();
        active_model.score = Set(Some(score));
        active_model.graded_at = Set(Some(Utc::now().naive_utc()));
        active_model.update(self.db).await
    }

    pub async fn grade_task_submission(
        &self,
        submission: task_submission::Model,
        score: i32,
    ) -> Result<task_submission::Model, DbErr> {
        let mut active_model: task_submission::ActiveModel = submission.into();
        active_model.score = Set(Some(score));
        active_model.graded_at = Set(Some(Utc::now().naive_utc()));
        active_model.update(self.db).await
    }

    /// Module ids the enrollment has answered or been scored on.
    pub async fn submitted_module_ids(&self, training_user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        module_submission::Entity::find()
            .select_only()
            .column(module_submission::Column::ModuleId)
            .filter(module_submission::Column::TrainingUserId.eq(training_user_id))
            .filter(
                Condition::any()
                    .add(module_submission::Column::Answer.is_not_null())
                    .add(module_submission::Column::Score.is_not_null()),
            )
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn submitted_quiz_ids(&self, training_user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        quiz_submission::Entity::find()
            .select_only()
            .column(quiz_submission::Column::QuizId)
            .filter(quiz_submission::Column::TrainingUserId.eq(training_user_id))
            .filter(
                Condition::any()
                    .add(quiz_submission::Column::Answers.is_not_null())
                    .add(quiz_submission::Column::Score.is_not_null()),
            )
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn submitted_task_ids(&self, training_user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        task_submission::Entity::find()
            .select_only()
            .column(task_submission::Column::TaskId)
            .filter(task_submission::Column::TrainingUserId.eq(training_user_id))
            .filter(
                Condition::any()
                    .add(task_submission::Column::Answer.is_not_null())
                    .add(task_submission::Column::Score.is_not_null()),
            )
            .into_tuple()
            .all(self.db)
            .await
    }

    /// Scores of graded module submissions in one meeting.
    pub async fn module_scores_in_meeting(
        &self,
        training_user_id: Uuid,
        meeting_id: Uuid,
    ) -> Result<Vec<i32>, DbErr> {
        module_submission::Entity::find()
            .select_only()
            .column(module_submission::Column::Score)
            .join(JoinType::InnerJoin, module_submission::Relation::Module.def())
            .filter(module::Column::MeetingId.eq(meeting_id))
            .filter(module_submission::Column::TrainingUserId.eq(training_user_id))
            .filter(module_submission::Column::Score.is_not_null())
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn quiz_scores_in_meeting(
        &self,
        training_user_id: Uuid,
        meeting_id: Uuid,
    ) -> Result<Vec<i32>, DbErr> {
        quiz_submission::Entity::find()
            .select_only()
            .column(quiz_submission::Column::Score)
            .join(JoinType::InnerJoin, quiz_submission::Relation::Quiz.def())
            .filter(quiz::Column::MeetingId.eq(meeting_id))
            .filter(quiz_submission::Column::TrainingUserId.eq(training_user_id))
            .filter(quiz_submission::Column::Score.is_not_null())
            .into_tuple()
            .all(self.db)
            .await
    }

    pub async fn task_scores_in_meeting(
        &self,
        training_user_id: Uuid,
        meeting_id: Uuid,
    ) -> Result<Vec<i32>, DbErr> {
        task_submission::Entity::find()
            .select_only()
            .column(task_submission::Column::Score)
            .join(JoinType::InnerJoin, task_submission::Relation::Task.def())
            .filter(task::Column::MeetingId.eq(meeting_id))
            .filter(task_submission::Column::TrainingUserId.eq(training_user_id))
            .filter(task_submission::Column::Score.is_not_null())
            .into_tuple()
            .all(self.db)
            .await
    }
}

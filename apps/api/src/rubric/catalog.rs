//! Static rubric tables. Ids are stable: they key stored scores and justifications.

use super::{Disposition, LevelDescriptor, RubricItem};

const fn levels(
    does_not_meet: &'static str,
    approaching: &'static str,
    meets: &'static str,
    exceeds: &'static str,
) -> [LevelDescriptor; 4] {
    [
        LevelDescriptor {
            level: 0,
            description: does_not_meet,
        },
        LevelDescriptor {
            level: 1,
            description: approaching,
        },
        LevelDescriptor {
            level: 2,
            description: meets,
        },
        LevelDescriptor {
            level: 3,
            description: exceeds,
        },
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Field evaluation (8 items)
// ────────────────────────────────────────────────────────────────────────────

pub static FIELD_EVALUATION_ITEMS: &[RubricItem] = &[
    RubricItem {
        id: "fe_learning_objectives",
        code: "FE1",
        title: "Learning Objectives",
        area: "Planning and Preparation",
        levels: levels(
            "Objectives are missing or unrelated to the standards addressed.",
            "Objectives are stated but vague or not measurable.",
            "Objectives are measurable, aligned to standards, and communicated to students.",
            "Objectives are measurable, aligned, differentiated, and revisited throughout the lesson.",
        ),
    },
    RubricItem {
        id: "fe_instructional_materials",
        code: "FE2",
        title: "Instructional Materials",
        area: "Planning and Preparation",
        levels: levels(
            "Materials are absent, inaccurate, or inappropriate for learners.",
            "Materials are accurate but only loosely support the objectives.",
            "Materials are accurate, organized, and support the objectives.",
            "Materials are varied, engaging, and adapted to individual learner needs.",
        ),
    },
    RubricItem {
        id: "fe_classroom_climate",
        code: "FE3",
        title: "Classroom Climate",
        area: "Learning Environment",
        levels: levels(
            "Interactions are negative or disrespectful; students appear unsafe.",
            "Interactions are neutral; respect is inconsistent.",
            "Interactions are respectful and supportive of learning.",
            "A warm, inclusive climate where students take risks and support peers.",
        ),
    },
    RubricItem {
        id: "fe_classroom_management",
        code: "FE4",
        title: "Classroom Management",
        area: "Learning Environment",
        levels: levels(
            "Routines are absent; significant instructional time is lost.",
            "Routines exist but require frequent teacher direction.",
            "Routines and transitions run smoothly with minimal lost time.",
            "Students manage routines independently; behavior is proactively supported.",
        ),
    },
    RubricItem {
        id: "fe_student_engagement",
        code: "FE5",
        title: "Student Engagement",
        area: "Instruction",
        levels: levels(
            "Few students are intellectually engaged.",
            "Some students are engaged; activities are mostly passive.",
            "Most students are actively engaged in meaningful work.",
            "All students are engaged and initiate or extend their own learning.",
        ),
    },
    RubricItem {
        id: "fe_questioning_discussion",
        code: "FE6",
        title: "Questioning and Discussion",
        area: "Instruction",
        levels: levels(
            "Questions are low-level with a single correct answer; little discussion.",
            "Some higher-order questions; discussion is teacher-centered.",
            "Open-ended questions promote thinking; most students participate.",
            "Students formulate questions and lead discussion with evidence.",
        ),
    },
    RubricItem {
        id: "fe_monitoring_learning",
        code: "FE7",
        title: "Monitoring Student Learning",
        area: "Assessment",
        levels: levels(
            "No evidence that student understanding is checked.",
            "Understanding is checked for the class as a whole only.",
            "Understanding is monitored for individuals and groups during the lesson.",
            "Monitoring is continuous and instruction is adjusted in response.",
        ),
    },
    RubricItem {
        id: "fe_feedback",
        code: "FE8",
        title: "Feedback to Students",
        area: "Assessment",
        levels: levels(
            "Feedback is absent or of poor quality.",
            "Feedback is general and not always timely.",
            "Feedback is specific, timely, and tied to the objectives.",
            "Feedback is specific and timely; students use it to improve their work.",
        ),
    },
];

// ────────────────────────────────────────────────────────────────────────────
// STER (12 items, no dispositions)
// ────────────────────────────────────────────────────────────────────────────

pub static STER_ITEMS: &[RubricItem] = &[
    RubricItem {
        id: "ster_content_knowledge",
        code: "1.1",
        title: "Content Knowledge",
        area: "Learner Development and Content",
        levels: levels(
            "Content errors are made or go uncorrected.",
            "Content is accurate but presented without connections.",
            "Content is accurate and connected to prior knowledge.",
            "Content is accurate, connected across disciplines, and anticipates misconceptions.",
        ),
    },
    RubricItem {
        id: "ster_learner_development",
        code: "1.2",
        title: "Learner Development",
        area: "Learner Development and Content",
        levels: levels(
            "Instruction ignores developmental needs of learners.",
            "Instruction acknowledges developmental needs inconsistently.",
            "Instruction is developmentally appropriate for the class.",
            "Instruction is tailored to individual developmental needs.",
        ),
    },
    RubricItem {
        id: "ster_learning_differences",
        code: "1.3",
        title: "Learning Differences",
        area: "Learner Development and Content",
        levels: levels(
            "No accommodations or differentiation are evident.",
            "Accommodations are provided only when required by plans.",
            "Instruction is differentiated for identified learner groups.",
            "Differentiation is flexible and responsive to ongoing evidence.",
        ),
    },
    RubricItem {
        id: "ster_planning",
        code: "2.1",
        title: "Planning for Instruction",
        area: "Planning and Assessment",
        levels: levels(
            "Plans are missing or incoherent.",
            "Plans exist but sequencing or alignment is weak.",
            "Plans are coherent, sequenced, and aligned to standards.",
            "Plans are coherent and build on assessment data from prior lessons.",
        ),
    },
    RubricItem {
        id: "ster_assessment",
        code: "2.2",
        title: "Assessment",
        area: "Planning and Assessment",
        levels: levels(
            "Assessments are absent or misaligned.",
            "Assessments are summative only.",
            "Formative and summative assessments are aligned to objectives.",
            "Students engage in self-assessment and track their own progress.",
        ),
    },
    RubricItem {
        id: "ster_instructional_strategies",
        code: "3.1",
        title: "Instructional Strategies",
        area: "Instructional Practice",
        levels: levels(
            "A single strategy is used regardless of learner response.",
            "A limited range of strategies is used.",
            "A variety of strategies supports the objectives.",
            "Strategies are chosen and adjusted deliberately to deepen understanding.",
        ),
    },
    RubricItem {
        id: "ster_communication",
        code: "3.2",
        title: "Communication",
        area: "Instructional Practice",
        levels: levels(
            "Directions and explanations are unclear or confusing.",
            "Directions are clear but explanations lack precision.",
            "Directions and explanations are clear and precise.",
            "Communication is clear and models academic language for students.",
        ),
    },
    RubricItem {
        id: "ster_technology",
        code: "3.3",
        title: "Use of Technology",
        area: "Instructional Practice",
        levels: levels(
            "Technology is absent where appropriate or used ineffectively.",
            "Technology is used for presentation only.",
            "Technology supports student learning of the objectives.",
            "Students use technology to create, collaborate, or investigate.",
        ),
    },
    RubricItem {
        id: "ster_learning_environment",
        code: "4.1",
        title: "Learning Environment",
        area: "Learning Environment",
        levels: levels(
            "The environment is unsafe or disorderly.",
            "The environment is orderly but not supportive of all learners.",
            "The environment is safe, orderly, and supportive.",
            "Students share responsibility for a positive learning community.",
        ),
    },
    RubricItem {
        id: "ster_behavior_management",
        code: "4.2",
        title: "Behavior Management",
        area: "Learning Environment",
        levels: levels(
            "Misbehavior is ignored or handled inappropriately.",
            "Responses to misbehavior are inconsistent.",
            "Expectations are clear and consistently reinforced.",
            "Behavior is proactively supported; students self-monitor.",
        ),
    },
    RubricItem {
        id: "ster_reflection",
        code: "5.1",
        title: "Reflection and Growth",
        area: "Professional Responsibility",
        levels: levels(
            "Does not reflect on practice.",
            "Reflection is descriptive rather than analytical.",
            "Reflection identifies strengths and areas for growth.",
            "Reflection leads to specific, implemented changes in practice.",
        ),
    },
    RubricItem {
        id: "ster_collaboration",
        code: "5.2",
        title: "Collaboration",
        area: "Professional Responsibility",
        levels: levels(
            "Does not collaborate with colleagues or families.",
            "Collaborates only when directed.",
            "Collaborates productively with colleagues and families.",
            "Initiates collaboration that benefits student learning.",
        ),
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Professional dispositions (field evaluation only)
// ────────────────────────────────────────────────────────────────────────────

pub static DISPOSITIONS: &[Disposition] = &[
    Disposition {
        id: "disp_professionalism",
        name: "Professionalism",
        description: "Conducts self in a professional manner consistent with school expectations.",
        criteria: &[
            "Arrives on time and prepared",
            "Dresses appropriately for the setting",
            "Maintains confidentiality of student information",
        ],
    },
    Disposition {
        id: "disp_communication",
        name: "Communication",
        description: "Communicates respectfully and effectively with students, staff, and families.",
        criteria: &[
            "Uses appropriate oral and written language",
            "Responds to communication promptly",
            "Listens actively to others",
        ],
    },
    Disposition {
        id: "disp_collaboration",
        name: "Collaboration",
        description: "Works cooperatively with the mentor teacher and school community.",
        criteria: &[
            "Contributes to team planning",
            "Shares resources and ideas",
            "Accepts shared responsibility for outcomes",
        ],
    },
    Disposition {
        id: "disp_reflection",
        name: "Reflective Practice",
        description: "Examines own practice and acts on feedback.",
        criteria: &[
            "Seeks feedback from mentor and supervisor",
            "Implements suggestions in subsequent lessons",
            "Identifies own strengths and growth areas",
        ],
    },
    Disposition {
        id: "disp_equity",
        name: "Commitment to Equity",
        description: "Believes all students can learn and acts to support each learner.",
        criteria: &[
            "Holds high expectations for all students",
            "Respects cultural and linguistic diversity",
            "Adapts instruction to include every learner",
        ],
    },
    Disposition {
        id: "disp_ethics",
        name: "Ethical Conduct",
        description: "Adheres to professional codes of ethics and legal responsibilities.",
        criteria: &[
            "Follows school and district policies",
            "Demonstrates honesty and integrity",
            "Reports concerns through appropriate channels",
        ],
    },
];
